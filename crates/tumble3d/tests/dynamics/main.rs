#[macro_use]
extern crate approx;

mod free_fall;
mod joints;
mod scene;
