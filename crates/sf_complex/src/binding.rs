use crate::ComplexMfe;

/// Complex MFE minus the MFEs of its isolated components (kcal/mol).
/// Negative values mean that binding is favorable.
pub fn binding_energy(complex_mfe: f64, components: &[f64]) -> f64 {
    complex_mfe - components.iter().sum::<f64>()
}

pub fn binding_occurs(binding_energy: f64) -> bool {
    binding_energy < 0.0
}

impl ComplexMfe {
    /// `None` if there is no favorable complex structure.
    pub fn binding_energy(&self, components: &[f64]) -> Option<f64> {
        self.energy().map(|e| binding_energy(e, components))
    }
}
