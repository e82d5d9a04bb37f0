// Power flow markers drawn over the house graphic
use super::telemetry::InstantReading;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSlot {
    Production,
    Heat,
    Charger,
    House,
}

impl FlowSlot {
    pub fn id(&self) -> &'static str {
        match self {
            FlowSlot::Production => "production",
            FlowSlot::Heat => "heat",
            FlowSlot::Charger => "charger",
            FlowSlot::House => "house",
        }
    }

    fn read(&self, reading: &InstantReading) -> f64 {
        match self {
            FlowSlot::Production => reading.solar,
            FlowSlot::Heat => reading.heat,
            FlowSlot::Charger => reading.ev_charger,
            FlowSlot::House => reading.house,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowColor {
    Neutral,
    Positive,
    Negative,
}

impl FlowColor {
    pub fn css(&self) -> &'static str {
        match self {
            FlowColor::Neutral => "gray",
            FlowColor::Positive => "green",
            FlowColor::Negative => "orange",
        }
    }
}

/// A fixed-position marker. Only `value` differs between ticks; position and
/// rotation are copied from the layout slot it was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowPoint {
    slot: FlowSlot,
    x: f64,
    y: f64,
    rotation: f64,
    value: f64,
}

impl FlowPoint {
    pub fn slot(&self) -> FlowSlot {
        self.slot
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Values whose magnitude is under `dead_band` count as no flow.
    pub fn color(&self, dead_band: f64) -> FlowColor {
        if self.value.abs() < dead_band {
            FlowColor::Neutral
        } else if self.value > 0.0 {
            FlowColor::Positive
        } else {
            FlowColor::Negative
        }
    }

    /// Total rotation in degrees: flipped for negative flow, plus the slot offset.
    pub fn orientation(&self) -> f64 {
        let base = if self.value < 0.0 { 180.0 } else { 0.0 };
        base + self.rotation
    }

    pub fn transform(&self) -> String {
        format!("rotate({}deg)", self.orientation())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotPlacement {
    pub slot: FlowSlot,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowLayout {
    placements: [SlotPlacement; 4],
}

impl FlowLayout {
    pub fn new(placements: [SlotPlacement; 4]) -> Self {
        Self { placements }
    }

    /// Every marker at zero flow.
    pub fn idle(&self) -> Vec<FlowPoint> {
        self.points(&InstantReading::default())
    }

    /// Build a fresh marker sequence carrying the reading's values.
    pub fn points(&self, reading: &InstantReading) -> Vec<FlowPoint> {
        self.placements
            .iter()
            .map(|placement| FlowPoint {
                slot: placement.slot,
                x: placement.x,
                y: placement.y,
                rotation: placement.rotation,
                value: placement.slot.read(reading),
            })
            .collect()
    }
}

impl Default for FlowLayout {
    fn default() -> Self {
        Self::new([
            SlotPlacement {
                slot: FlowSlot::Production,
                x: 52.0,
                y: 25.0,
                rotation: 0.0,
            },
            SlotPlacement {
                slot: FlowSlot::Heat,
                x: 25.0,
                y: 42.0,
                rotation: -90.0,
            },
            SlotPlacement {
                slot: FlowSlot::Charger,
                x: 25.0,
                y: 77.0,
                rotation: -90.0,
            },
            SlotPlacement {
                slot: FlowSlot::House,
                x: 74.0,
                y: 62.0,
                rotation: 90.0,
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(value: f64, rotation: f64) -> FlowPoint {
        FlowPoint {
            slot: FlowSlot::House,
            x: 0.0,
            y: 0.0,
            rotation,
            value,
        }
    }

    #[test]
    fn test_color_respects_dead_band() {
        assert_eq!(point(9.9, 0.0).color(10.0), FlowColor::Neutral);
        assert_eq!(point(-9.9, 0.0).color(10.0), FlowColor::Neutral);
        assert_eq!(point(10.0, 0.0).color(10.0), FlowColor::Positive);
        assert_eq!(point(-10.0, 0.0).color(10.0), FlowColor::Negative);

        // Same value, narrower band
        assert_eq!(point(1.0, 0.0).color(0.5), FlowColor::Positive);
        assert_eq!(point(0.4, 0.0).color(0.5), FlowColor::Neutral);
    }

    #[test]
    fn test_orientation_adds_slot_rotation() {
        assert_eq!(point(50.0, 0.0).orientation(), 0.0);
        assert_eq!(point(-50.0, 0.0).orientation(), 180.0);
        assert_eq!(point(-50.0, -90.0).orientation(), 90.0);
        assert_eq!(point(0.0, 90.0).orientation(), 90.0);
        assert_eq!(point(-1.0, 90.0).transform(), "rotate(270deg)");
    }

    #[test]
    fn test_points_keep_layout_and_take_values() {
        let layout = FlowLayout::default();
        let reading = InstantReading {
            solar: 1500.0,
            heat: -200.0,
            ev_charger: -3000.0,
            house: 450.0,
        };

        let points = layout.points(&reading);

        assert_eq!(points.len(), 4);
        for (point, placement) in points.iter().zip(layout.placements.iter()) {
            assert_eq!(point.slot(), placement.slot);
            assert_eq!(point.x(), placement.x);
            assert_eq!(point.y(), placement.y);
            assert_eq!(point.rotation(), placement.rotation);
        }
        let values: Vec<f64> = points.iter().map(FlowPoint::value).collect();
        assert_eq!(values, vec![1500.0, -200.0, -3000.0, 450.0]);
    }
}
