//! A smoothed-particle-hydrodynamics engine for compressible,
//! self-gravitating fluids in one, two or three dimensions, switchable
//! between standard (density-energy), pressure-energy (DISPH) and Godunov
//! (GSPH) formulations.
//!
//! [`driver::Sim`] is the entry point: build a [`parameters::ParameterBundle`]
//! through [`parameters::ParameterBuilder`], hand it a particle set (see
//! [`ics`] for ready-made test scenarios), and call [`driver::Sim::step`] or
//! [`driver::Sim::run`].

pub mod boundary;
pub mod dimension;
pub mod driver;
pub mod error;
pub mod extent;
pub mod ghost;
pub mod gravity;
pub mod ics;
pub mod kernel;
pub mod log_setup;
pub mod output;
pub mod parameters;
pub mod particle;
pub mod periodic;
pub mod smoothing;
pub mod sph;
pub mod test_utils;
pub mod timestep;
pub mod tree;
