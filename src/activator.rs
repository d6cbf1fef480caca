//! Activation function types.

/// [Activation function](https://en.wikipedia.org/wiki/Activation_function)
/// types.
///
/// The backward pass differentiates through `fprime`, so a new variant is
/// only usable once it carries its own derivative here.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Activator {
    /// Logistic sigmoid, `1 / (1 + e^-x)`.
    Sigmoid,
}

impl Activator {
    /// Looks up an activation function by name.
    ///
    /// ```
    /// # use gradnet::activator::Activator;
    /// assert_eq!(Activator::from_name("Logistic"), Some(Activator::Sigmoid));
    /// assert_eq!(Activator::from_name("relu"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Activator> {
        match name.to_ascii_lowercase().as_str() {
            "sigmoid" | "logistic" | "softstep" => Some(Activator::Sigmoid),
            _ => None,
        }
    }

    /// Evaluates `f(z)` for the selected activation function.
    pub fn f(&self, z: f64) -> f64 {
        match self {
            Activator::Sigmoid => 1.0 / (1.0 + (-z).exp()),
        }
    }

    /// Evaluates the derivative `f'(z)` at the pre-activation value `z`.
    pub fn fprime(&self, z: f64) -> f64 {
        match self {
            Activator::Sigmoid => {
                let s = self.f(z);
                s * (1.0 - s)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sigmoid_values() {
        let s = Activator::Sigmoid;
        assert_abs_diff_eq!(s.f(0.0), 0.5);
        assert_abs_diff_eq!(s.f(0.5), 0.622_459_331, epsilon = 1e-9);
        assert!(s.f(50.0) > 0.999_999);
        assert!(s.f(-50.0) < 1e-6);
    }

    #[test]
    fn sigmoid_derivative_peaks_at_zero() {
        let s = Activator::Sigmoid;
        assert_abs_diff_eq!(s.fprime(0.0), 0.25);
        assert!(s.fprime(2.0) < 0.25);
        assert_abs_diff_eq!(s.fprime(2.0), s.fprime(-2.0), epsilon = 1e-12);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Activator::from_name("SIGMOID"), Some(Activator::Sigmoid));
        assert_eq!(Activator::from_name("softstep"), Some(Activator::Sigmoid));
        assert_eq!(Activator::from_name("tanh"), None);
    }
}
