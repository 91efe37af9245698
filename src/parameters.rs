//! The parameter bundle and its type-staged builder (spec §6/§9).
//!
//! `ParameterBuilder` collects the fields every formulation needs, then
//! `.as_ssph()` / `.as_disph()` / `.as_gsph()` hand off to a sub-builder
//! that only exposes the setters valid for that formulation — there is no
//! way to call `.artificial_conductivity_alpha()` on a GSPH builder,
//! because the type returned by `.as_gsph()` simply has no such method.
//! Cross-field validation (gamma > 1, positive smoothing targets, and so
//! on) is deferred to the terminal `.build()`, matching the style of
//! `SimulationBuilder`'s validation-on-build in the teacher, generalized
//! with typestate so formulation/parameter mismatches are caught earlier,
//! at the call site, rather than by a runtime panic.

use crate::boundary::BoundaryConfig;
use crate::dimension::Dimension;
use crate::error::SphError;
use crate::gravity::GravityParams;
use crate::smoothing::SmoothingParams;
use crate::sph::ArtificialViscosityParams;
use crate::timestep::TimestepParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelKind {
    CubicSpline,
    WendlandC4,
}

#[derive(Debug, Clone, Copy)]
pub enum FormulationParams {
    Ssph {
        artificial_viscosity: ArtificialViscosityParams,
    },
    Disph {
        artificial_viscosity: ArtificialViscosityParams,
    },
    Gsph,
}

#[derive(Debug, Clone)]
pub struct ParameterBundle<D: Dimension> {
    pub gamma: f64,
    pub kernel: KernelKind,
    pub formulation: FormulationParams,
    pub smoothing: SmoothingParams,
    pub gravity: Option<GravityParams>,
    pub timestep: TimestepParams,
    pub boundary: BoundaryConfig<D>,
    pub particle_output_interval: f64,
    pub energy_output_interval: f64,
    pub alpha_viscosity_bounds: (f64, f64),
    pub viscosity_decay_time_constant: f64,
}

/// The initial, formulation-agnostic stage of the builder.
pub struct ParameterBuilder<D: Dimension> {
    gamma: Option<f64>,
    kernel: KernelKind,
    smoothing: SmoothingParams,
    gravity: Option<GravityParams>,
    timestep: TimestepParams,
    boundary: Option<BoundaryConfig<D>>,
    particle_output_interval: f64,
    energy_output_interval: f64,
    alpha_viscosity_bounds: (f64, f64),
    viscosity_decay_time_constant: f64,
}

impl<D: Dimension> Default for ParameterBuilder<D> {
    fn default() -> Self {
        Self {
            gamma: None,
            kernel: KernelKind::CubicSpline,
            smoothing: SmoothingParams::default(),
            gravity: None,
            timestep: TimestepParams::default(),
            boundary: None,
            particle_output_interval: 0.0,
            energy_output_interval: 0.0,
            alpha_viscosity_bounds: (0.1, 1.5),
            viscosity_decay_time_constant: 0.2,
        }
    }
}

impl<D: Dimension> ParameterBuilder<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }

    pub fn kernel(mut self, kernel: KernelKind) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn smoothing(mut self, smoothing: SmoothingParams) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn gravity(mut self, gravity: GravityParams) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn timestep(mut self, timestep: TimestepParams) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn boundary(mut self, boundary: BoundaryConfig<D>) -> Self {
        self.boundary = Some(boundary);
        self
    }

    pub fn particle_output_interval(mut self, interval: f64) -> Self {
        self.particle_output_interval = interval;
        self
    }

    pub fn energy_output_interval(mut self, interval: f64) -> Self {
        self.energy_output_interval = interval;
        self
    }

    pub fn viscosity_alpha_bounds(mut self, min: f64, max: f64) -> Self {
        self.alpha_viscosity_bounds = (min, max);
        self
    }

    pub fn as_ssph(self) -> SsphBuilder<D> {
        SsphBuilder {
            base: self,
            artificial_viscosity: ArtificialViscosityParams::default(),
        }
    }

    pub fn as_disph(self) -> DisphBuilder<D> {
        DisphBuilder {
            base: self,
            artificial_viscosity: ArtificialViscosityParams::default(),
        }
    }

    pub fn as_gsph(self) -> GsphBuilder<D> {
        GsphBuilder { base: self }
    }
}

fn validate_and_finish<D: Dimension>(
    base: ParameterBuilder<D>,
    formulation: FormulationParams,
) -> Result<ParameterBundle<D>, SphError> {
    let gamma = base.gamma.ok_or_else(|| SphError::ConfigurationError {
        detail: "adiabatic index gamma was not set".to_string(),
    })?;
    if gamma <= 1.0 {
        return Err(SphError::ConfigurationError {
            detail: format!("gamma must be > 1.0, got {gamma}"),
        });
    }
    let boundary = base.boundary.ok_or_else(|| SphError::ConfigurationError {
        detail: "boundary configuration was not set".to_string(),
    })?;
    if base.smoothing.target_neighbors <= 0.0 {
        return Err(SphError::ConfigurationError {
            detail: "target_neighbors must be positive".to_string(),
        });
    }
    if let Some(g) = &base.gravity {
        if g.softening_length < 0.0 {
            return Err(SphError::ConfigurationError {
                detail: "gravitational softening length must be non-negative".to_string(),
            });
        }
    }
    if base.alpha_viscosity_bounds.0 > base.alpha_viscosity_bounds.1 {
        return Err(SphError::ConfigurationError {
            detail: "viscosity alpha_min must not exceed alpha_max".to_string(),
        });
    }

    Ok(ParameterBundle {
        gamma,
        kernel: base.kernel,
        formulation,
        smoothing: base.smoothing,
        gravity: base.gravity,
        timestep: base.timestep,
        boundary,
        particle_output_interval: base.particle_output_interval,
        energy_output_interval: base.energy_output_interval,
        alpha_viscosity_bounds: base.alpha_viscosity_bounds,
        viscosity_decay_time_constant: base.viscosity_decay_time_constant,
    })
}

pub struct SsphBuilder<D: Dimension> {
    base: ParameterBuilder<D>,
    artificial_viscosity: ArtificialViscosityParams,
}

impl<D: Dimension> SsphBuilder<D> {
    pub fn artificial_viscosity(mut self, params: ArtificialViscosityParams) -> Self {
        self.artificial_viscosity = params;
        self
    }

    pub fn build(self) -> Result<ParameterBundle<D>, SphError> {
        validate_and_finish(
            self.base,
            FormulationParams::Ssph {
                artificial_viscosity: self.artificial_viscosity,
            },
        )
    }
}

pub struct DisphBuilder<D: Dimension> {
    base: ParameterBuilder<D>,
    artificial_viscosity: ArtificialViscosityParams,
}

impl<D: Dimension> DisphBuilder<D> {
    pub fn artificial_viscosity(mut self, params: ArtificialViscosityParams) -> Self {
        self.artificial_viscosity = params;
        self
    }

    pub fn build(self) -> Result<ParameterBundle<D>, SphError> {
        validate_and_finish(
            self.base,
            FormulationParams::Disph {
                artificial_viscosity: self.artificial_viscosity,
            },
        )
    }
}

pub struct GsphBuilder<D: Dimension> {
    base: ParameterBuilder<D>,
}

impl<D: Dimension> GsphBuilder<D> {
    pub fn build(self) -> Result<ParameterBundle<D>, SphError> {
        validate_and_finish(self.base, FormulationParams::Gsph)
    }
}
