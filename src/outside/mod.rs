mod command;
mod ffmpeg;

pub use ffmpeg::{Ffmpeg, MediaEngine};
