/// Unit of measurement of a converted channel.
///
/// Pressures are published with their own unit, channels measuring the same quantity with
/// different sensors are not normalized to a common unit.
// Built upon https://doc.riot-os.org/phydat_8h_source.html
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum MeasurementUnit {
    /// Bar (bar).
    Bar,
    /// Degrees Celsius (°C).
    Celsius,
    /// Kilopascal (kPa).
    Kilopascal,
    /// Millivolt (mV).
    Millivolt,
    /// Pound-force per square inch (psi).
    Psi,
}

impl core::fmt::Display for MeasurementUnit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bar => write!(f, "bar"),
            Self::Celsius => write!(f, "°C"), // The Unicode Standard v15 recommends using U+00B0 + U+0043.
            Self::Kilopascal => write!(f, "kPa"),
            Self::Millivolt => write!(f, "mV"),
            Self::Psi => write!(f, "psi"),
        }
    }
}
