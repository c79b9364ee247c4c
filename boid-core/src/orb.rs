//! User-placed point sources that attract or repel nearby boids.

use crate::Vector2D;

pub const DEFAULT_ORB_RADIUS: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OrbKind {
    Attractor,
    Repulsor,
}

impl OrbKind {
    /// +1 pulls boids in, -1 pushes them away
    pub fn sign(self) -> f32 {
        match self {
            OrbKind::Attractor => 1.0,
            OrbKind::Repulsor => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orb {
    pub position: Vector2D,
    pub radius: f32,
    pub kind: OrbKind,
}

/// What the renderer needs to draw one orb
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbView {
    pub position: Vector2D,
    pub radius: f32,
    pub kind: OrbKind,
}

impl Orb {
    pub fn new(position: Vector2D, kind: OrbKind) -> Self {
        Self {
            position,
            radius: DEFAULT_ORB_RADIUS,
            kind,
        }
    }

    pub fn view(&self) -> OrbView {
        OrbView {
            position: self.position,
            radius: self.radius,
            kind: self.kind,
        }
    }
}

/// Pointer buttons as reported by `MouseEvent.button`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Auxiliary,
    Secondary,
}

impl PointerButton {
    pub fn from_dom_button(button: i16) -> Option<Self> {
        match button {
            0 => Some(PointerButton::Primary),
            1 => Some(PointerButton::Auxiliary),
            2 => Some(PointerButton::Secondary),
            _ => None,
        }
    }
}

/// Which orb each pointer button places.
///
/// Defaults to repulsor on primary click and attractor on secondary click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrbBindings {
    pub primary: Option<OrbKind>,
    pub secondary: Option<OrbKind>,
}

impl Default for OrbBindings {
    fn default() -> Self {
        Self {
            primary: Some(OrbKind::Repulsor),
            secondary: Some(OrbKind::Attractor),
        }
    }
}

impl OrbBindings {
    pub fn swapped(self) -> Self {
        Self {
            primary: self.secondary,
            secondary: self.primary,
        }
    }

    pub fn kind_for(&self, button: PointerButton) -> Option<OrbKind> {
        match button {
            PointerButton::Primary => self.primary,
            PointerButton::Secondary => self.secondary,
            PointerButton::Auxiliary => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orb_kind_sign() {
        assert_eq!(OrbKind::Attractor.sign(), 1.0);
        assert_eq!(OrbKind::Repulsor.sign(), -1.0);
    }

    #[test]
    fn test_default_bindings() {
        let bindings = OrbBindings::default();
        assert_eq!(bindings.kind_for(PointerButton::Primary), Some(OrbKind::Repulsor));
        assert_eq!(bindings.kind_for(PointerButton::Secondary), Some(OrbKind::Attractor));
        assert_eq!(bindings.kind_for(PointerButton::Auxiliary), None);
    }

    #[test]
    fn test_swapped_bindings() {
        let bindings = OrbBindings::default().swapped();
        assert_eq!(bindings.kind_for(PointerButton::Primary), Some(OrbKind::Attractor));
        assert_eq!(bindings.kind_for(PointerButton::Secondary), Some(OrbKind::Repulsor));
        assert_eq!(bindings.swapped(), OrbBindings::default());
    }

    #[test]
    fn test_dom_button_mapping() {
        assert_eq!(PointerButton::from_dom_button(0), Some(PointerButton::Primary));
        assert_eq!(PointerButton::from_dom_button(1), Some(PointerButton::Auxiliary));
        assert_eq!(PointerButton::from_dom_button(2), Some(PointerButton::Secondary));
        assert_eq!(PointerButton::from_dom_button(3), None);
    }

    #[test]
    fn test_orb_view() {
        let orb = Orb::new(Vector2D::new(3.0, 4.0), OrbKind::Attractor);
        let view = orb.view();
        assert_eq!(view.position, orb.position);
        assert_eq!(view.radius, DEFAULT_ORB_RADIUS);
        assert_eq!(view.kind, OrbKind::Attractor);
    }
}
