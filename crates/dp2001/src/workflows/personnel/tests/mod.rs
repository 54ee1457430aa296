mod common;
mod concurrency;
mod recorder;
