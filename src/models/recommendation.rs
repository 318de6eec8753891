use serde::{Deserialize, Serialize};

/// Highest number of stars a recommendation card can show
pub const MAX_STARS: u8 = 5;

/// A single movie or show suggestion attached to an assistant turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub year: i32,
    pub genre: String,
    /// Rating on a 0-10 scale
    pub rating: f64,
}

impl Recommendation {
    pub fn new(title: impl Into<String>, year: i32, genre: impl Into<String>, rating: f64) -> Self {
        Self {
            title: title.into(),
            year,
            genre: genre.into(),
            rating,
        }
    }

    /// Number of filled stars on a five-star scale.
    ///
    /// Halves the rating and rounds half away from zero, so 7.0 shows four stars.
    pub fn filled_stars(&self) -> u8 {
        (self.rating / 2.0).round().clamp(0.0, f64::from(MAX_STARS)) as u8
    }

    /// Rating with one decimal place, e.g. `8.1/10`
    pub fn rating_label(&self) -> String {
        format!("{:.1}/10", self.rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(rating: f64) -> Recommendation {
        Recommendation::new("Inception", 2010, "Sci-Fi", rating)
    }

    #[test]
    fn test_filled_stars_bounds() {
        assert_eq!(rated(0.0).filled_stars(), 0);
        assert_eq!(rated(10.0).filled_stars(), 5);
    }

    #[test]
    fn test_filled_stars_rounds_half_up() {
        assert_eq!(rated(7.0).filled_stars(), 4);
        assert_eq!(rated(8.8).filled_stars(), 4);
        assert_eq!(rated(9.3).filled_stars(), 5);
        assert_eq!(rated(2.9).filled_stars(), 1);
    }

    #[test]
    fn test_filled_stars_clamps_out_of_range() {
        assert_eq!(rated(14.0).filled_stars(), 5);
        assert_eq!(rated(-3.0).filled_stars(), 0);
    }

    #[test]
    fn test_rating_label() {
        assert_eq!(rated(8.1).rating_label(), "8.1/10");
        assert_eq!(rated(9.0).rating_label(), "9.0/10");
    }

    #[test]
    fn test_deserialize_backend_payload() {
        let json = r#"{"title":"The Shawshank Redemption","year":1994,"genre":"Drama","rating":9.3}"#;
        let rec: Recommendation = serde_json::from_str(json).unwrap();
        assert_eq!(
            rec,
            Recommendation::new("The Shawshank Redemption", 1994, "Drama", 9.3)
        );
    }
}
