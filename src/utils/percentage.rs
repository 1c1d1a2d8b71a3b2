use std::{fmt::Display, ops::Deref};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

impl Percentage {
    pub fn new_opt(value: f64) -> Option<Percentage> {
        if value < 0. || value.is_nan() {
            None
        } else {
            Some(Percentage(value))
        }
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Share of `value` in `whole`. There is no meaningful share of nothing, so an empty `whole`
/// gives [None].
pub fn hours_percentage(value: f64, whole: f64) -> Option<Percentage> {
    if whole <= 0. {
        return None;
    }
    Percentage::new_opt(value / whole * 100.)
}

#[cfg(test)]
mod tests {
    use super::{hours_percentage, Percentage};

    #[test]
    fn test_hours_percentage() {
        assert_eq!(hours_percentage(3.5, 4.5).map(|v| v.to_string()).as_deref(), Some("77.8%"));
        assert_eq!(*hours_percentage(1., 4.).unwrap(), 25.);
        assert_eq!(hours_percentage(0., 0.), None);
    }

    #[test]
    fn test_negative_percentage() {
        assert_eq!(Percentage::new_opt(-1.), None);
        assert_eq!(Percentage::new_opt(f64::NAN), None);
    }
}
