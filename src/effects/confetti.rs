//! Confetti burst for the win celebration

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Pieces added per win
pub const CONFETTI_BURST_SIZE: usize = 50;

pub const CONFETTI_PALETTE: [&str; 8] = [
    "#f00", "#0f0", "#00f", "#ff0", "#f0f", "#0ff", "#ff8800", "#8800ff",
];

const MIN_SIZE_PX: f32 = 2.0;
const SIZE_SPREAD_PX: f32 = 4.0;
const MAX_DELAY_SECS: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfettiShape {
    Circle,
    Rectangle,
    Square,
}

/// A single confetti element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfettiPiece {
    /// Horizontal position as a percentage of the container width
    pub left_pct: f32,
    pub delay_secs: f32,
    pub opacity: f32,
    pub width_px: f32,
    pub height_px: f32,
    pub shape: ConfettiShape,
    pub color: String,
    /// Ready-to-apply inline style, derived from the fields above
    pub style: String,
}

impl ConfettiPiece {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let left_pct = rng.gen::<f32>() * 100.0;
        let delay_secs = rng.gen::<f32>() * MAX_DELAY_SECS;
        let opacity = 0.5 + rng.gen::<f32>() * 0.5;
        let size = MIN_SIZE_PX + rng.gen::<f32>() * SIZE_SPREAD_PX;

        // Two independent draws: 40% circles, then 40% of the rest rectangles
        let (shape, width_px, height_px) = if rng.gen::<f32>() > 0.6 {
            (ConfettiShape::Circle, size, size)
        } else if rng.gen::<f32>() > 0.6 {
            (ConfettiShape::Rectangle, size * 0.7, size * 1.5)
        } else {
            (ConfettiShape::Square, size, size)
        };

        let color = CONFETTI_PALETTE[rng.gen_range(0..CONFETTI_PALETTE.len())].to_string();

        let mut piece = Self {
            left_pct,
            delay_secs,
            opacity,
            width_px,
            height_px,
            shape,
            color,
            style: String::new(),
        };
        piece.style = piece.css_style();
        piece
    }

    /// Inline style for a `.confetti` element
    pub fn css_style(&self) -> String {
        let mut style = format!(
            "left: {:.2}%; animation-delay: {:.2}s; opacity: {:.2}; \
             width: {:.2}px; height: {:.2}px; background-color: {};",
            self.left_pct,
            self.delay_secs,
            self.opacity,
            self.width_px,
            self.height_px,
            self.color
        );
        if self.shape == ConfettiShape::Circle {
            style.push_str(" border-radius: 50%;");
        }
        style
    }
}

/// Generate `count` random confetti pieces
pub fn generate_burst<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<ConfettiPiece> {
    (0..count).map(|_| ConfettiPiece::random(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_burst_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let burst = generate_burst(&mut rng, CONFETTI_BURST_SIZE);
        assert_eq!(burst.len(), CONFETTI_BURST_SIZE);

        for piece in &burst {
            assert!((0.0..=100.0).contains(&piece.left_pct));
            assert!((0.0..=MAX_DELAY_SECS).contains(&piece.delay_secs));
            assert!((0.5..=1.0).contains(&piece.opacity));
            assert!(CONFETTI_PALETTE.contains(&piece.color.as_str()));
            assert_eq!(piece.style, piece.css_style());
            assert!(piece.style.contains(&piece.color));

            match piece.shape {
                ConfettiShape::Circle | ConfettiShape::Square => {
                    assert_eq!(piece.width_px, piece.height_px);
                    assert!((MIN_SIZE_PX..=MIN_SIZE_PX + SIZE_SPREAD_PX).contains(&piece.width_px));
                }
                ConfettiShape::Rectangle => {
                    assert!(piece.height_px > piece.width_px);
                    let size = piece.width_px / 0.7;
                    assert!((piece.height_px - size * 1.5).abs() < 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_burst_mixes_shapes() {
        let mut rng = ChaCha8Rng::seed_from_u64(2048);
        let burst = generate_burst(&mut rng, 500);
        for shape in [ConfettiShape::Circle, ConfettiShape::Rectangle, ConfettiShape::Square] {
            assert!(burst.iter().any(|p| p.shape == shape), "missing {:?}", shape);
        }
    }

    #[test]
    fn test_same_seed_same_burst() {
        let a = generate_burst(&mut ChaCha8Rng::seed_from_u64(1), 10);
        let b = generate_burst(&mut ChaCha8Rng::seed_from_u64(1), 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_css_style() {
        let piece = ConfettiPiece {
            left_pct: 12.5,
            delay_secs: 1.0,
            opacity: 0.75,
            width_px: 4.0,
            height_px: 4.0,
            shape: ConfettiShape::Circle,
            color: "#f00".to_string(),
            style: String::new(),
        };
        assert_eq!(
            piece.css_style(),
            "left: 12.50%; animation-delay: 1.00s; opacity: 0.75; \
             width: 4.00px; height: 4.00px; background-color: #f00; border-radius: 50%;"
        );

        let square = ConfettiPiece {
            shape: ConfettiShape::Square,
            ..piece
        };
        assert!(!square.css_style().contains("border-radius"));
    }
}
