#[macro_use]
extern crate approx;

mod box_box;
mod hierarchy;
mod hull_cache;
mod hull_sphere;
mod partitioning;
mod sphere_sphere;
mod terrain_patch;
