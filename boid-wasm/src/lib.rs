use boid_core::{
    AgentView, BoundaryMode, Flock, Orb, OrbBindings, OrbKind, OrbView, PointerButton, Rgb,
    SimulationParams, Vector2D,
};
use boid_shared::{FlockSettings, FlockStatus, SettingsUpdate};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

const BACKGROUND: &str = "#0a0a0a";
/// Triangle length in pixels per unit of boid size
const BOID_SCALE: f64 = 4.0;

#[wasm_bindgen]
pub struct FlockSimulation {
    flock: Flock,
    bindings: OrbBindings,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

#[wasm_bindgen]
impl FlockSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, width: f64, height: f64) -> Result<FlockSimulation, JsValue> {
        Self::build(canvas_id, width, height, FlockSettings::default())
    }

    /// Same as the constructor, but starts from a settings JSON document
    #[wasm_bindgen(js_name = fromSettings)]
    pub fn from_settings(
        canvas_id: &str,
        width: f64,
        height: f64,
        settings_json: &str,
    ) -> Result<FlockSimulation, JsValue> {
        let settings = FlockSettings::from_json(settings_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::build(canvas_id, width, height, settings)
    }

    fn build(
        canvas_id: &str,
        width: f64,
        height: f64,
        settings: FlockSettings,
    ) -> Result<FlockSimulation, JsValue> {
        console_log!(
            "Initializing flock simulation with {} boids",
            settings.num_boids
        );

        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let flock = Flock::new(width as f32, height as f32, settings.to_params());

        Ok(FlockSimulation {
            flock,
            bindings: settings.orb_bindings,
            canvas,
            context,
        })
    }

    /// One animation tick: step the engine, then draw
    pub fn tick(&mut self) -> Result<(), JsValue> {
        self.update();
        self.render()
    }

    pub fn update(&mut self) {
        self.flock.update();
    }

    pub fn render(&self) -> Result<(), JsValue> {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;

        self.context.set_fill_style_str(BACKGROUND);
        self.context.fill_rect(0.0, 0.0, width, height);

        for orb in self.flock.orb_views() {
            self.draw_orb(&orb)?;
        }

        for agent in self.flock.agent_views() {
            self.draw_boid(&agent)?;
        }

        Ok(())
    }

    fn draw_boid(&self, agent: &AgentView) -> Result<(), JsValue> {
        let size = agent.size as f64 * BOID_SCALE;

        self.context.save();
        self.context
            .translate(agent.position.x as f64, agent.position.y as f64)?;
        self.context.rotate(agent.heading as f64)?;

        // Triangle pointing in the direction of movement
        self.context.begin_path();
        self.context.move_to(size, 0.0);
        self.context.line_to(-size / 2.0, size / 2.0);
        self.context.line_to(-size / 2.0, -size / 2.0);
        self.context.close_path();

        self.context.set_fill_style_str(&css_color(agent.color));
        self.context.fill();

        self.context.restore();

        Ok(())
    }

    fn draw_orb(&self, orb: &OrbView) -> Result<(), JsValue> {
        let (fill, stroke) = orb_colors(orb.kind);

        self.context.begin_path();
        self.context.arc(
            orb.position.x as f64,
            orb.position.y as f64,
            orb.radius as f64,
            0.0,
            std::f64::consts::TAU,
        )?;
        self.context.set_fill_style_str(fill);
        self.context.fill();
        self.context.set_stroke_style_str(stroke);
        self.context.set_line_width(2.0);
        self.context.stroke();

        Ok(())
    }

    /// Places the orb bound to the pressed button. Returns whether one was placed.
    pub fn handle_pointer_down(&mut self, event: MouseEvent) -> bool {
        event.prevent_default();

        let Some(button) = PointerButton::from_dom_button(event.button()) else {
            return false;
        };

        let canvas_element: &Element = self.canvas.as_ref();
        let rect = canvas_element.get_bounding_client_rect();
        let x = event.client_x() as f64 - rect.left();
        let y = event.client_y() as f64 - rect.top();

        match self
            .flock
            .place_orb(Vector2D::new(x as f32, y as f32), button, &self.bindings)
        {
            Some(kind) => {
                console_log!(
                    "Placed {:?} at ({:.0}, {:.0}). Total orbs: {}",
                    kind,
                    x,
                    y,
                    self.flock.orbs.len()
                );
                true
            }
            None => false,
        }
    }

    /// Suppresses the browser menu so secondary clicks can place orbs
    pub fn handle_context_menu(&self, event: MouseEvent) {
        event.prevent_default();
    }

    pub fn place_orb(&mut self, x: f64, y: f64, attractor: bool) {
        let kind = if attractor {
            OrbKind::Attractor
        } else {
            OrbKind::Repulsor
        };
        self.flock
            .add_orb(Orb::new(Vector2D::new(x as f32, y as f32), kind));
    }

    pub fn swap_orb_buttons(&mut self) {
        self.bindings = self.bindings.swapped();
        console_log!("Orb bindings: {:?}", self.bindings);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        self.flock.resize(width as f32, height as f32);
        console_log!("Resized to {}x{}", width, height);
    }

    pub fn reset(&mut self) {
        self.flock.reset();
    }

    pub fn restore_defaults(&mut self) {
        self.flock.restore_defaults();
        self.bindings = OrbBindings::default();
        console_log!("Restored defaults with {} boids", self.flock.boids.len());
    }

    pub fn boid_count(&self) -> usize {
        self.flock.boids.len()
    }

    pub fn orb_count(&self) -> usize {
        self.flock.orbs.len()
    }

    pub fn is_wrapping(&self) -> bool {
        self.flock.params.boundary.is_wrap()
    }

    pub fn set_num_boids(&mut self, count: usize) {
        self.apply(SettingsUpdate::NumBoids(count));
    }

    pub fn set_perception_radius(&mut self, radius: f64) {
        self.apply(SettingsUpdate::PerceptionRadius(radius as f32));
    }

    pub fn set_separation_weight(&mut self, weight: f64) {
        self.apply(SettingsUpdate::SeparationWeight(weight as f32));
    }

    pub fn set_alignment_weight(&mut self, weight: f64) {
        self.apply(SettingsUpdate::AlignmentWeight(weight as f32));
    }

    pub fn set_cohesion_weight(&mut self, weight: f64) {
        self.apply(SettingsUpdate::CohesionWeight(weight as f32));
    }

    pub fn set_max_speed(&mut self, speed: f64) {
        self.apply(SettingsUpdate::MaxSpeed(speed as f32));
    }

    pub fn set_max_force(&mut self, force: f64) {
        self.apply(SettingsUpdate::MaxForce(force as f32));
    }

    pub fn set_orb_strength(&mut self, strength: f64) {
        self.apply(SettingsUpdate::OrbStrength(strength as f32));
    }

    pub fn set_wrap_boundary(&mut self, wrap: bool) {
        let mode = if wrap {
            BoundaryMode::Wrap
        } else {
            BoundaryMode::Bounce
        };
        self.apply(SettingsUpdate::Boundary(mode));
    }

    pub fn toggle_boundary(&mut self) {
        self.apply(SettingsUpdate::ToggleBoundary);
    }

    /// Applies a `{"param": ..., "value": ...}` update sent by the page
    pub fn apply_update(&mut self, update_json: &str) -> Result<(), JsValue> {
        let update = SettingsUpdate::from_json(update_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.apply(update);
        Ok(())
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        FlockSettings::from_parts(self.flock.params, self.bindings)
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Current `FlockStatus` as a plain JS object
    pub fn status(&self) -> Result<JsValue, JsValue> {
        let json = serde_json::to_string(&FlockStatus::of(&self.flock))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        js_sys::JSON::parse(&json)
    }
}

impl FlockSimulation {
    fn apply(&mut self, update: SettingsUpdate) {
        if update == SettingsUpdate::RestoreDefaults {
            self.restore_defaults();
            return;
        }

        let mut params: SimulationParams = self.flock.params;
        update.apply(&mut params);
        if self.flock.set_params(params) {
            console_log!("Population reset to {} boids", self.flock.boids.len());
        }
    }
}

fn css_color(color: Rgb) -> String {
    format!("rgb({}, {}, {})", color.r, color.g, color.b)
}

fn orb_colors(kind: OrbKind) -> (&'static str, &'static str) {
    match kind {
        OrbKind::Attractor => ("rgba(80, 200, 120, 0.35)", "rgb(80, 200, 120)"),
        OrbKind::Repulsor => ("rgba(230, 80, 80, 0.35)", "rgb(230, 80, 80)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(Rgb::new(1, 20, 255)), "rgb(1, 20, 255)");
    }

    #[test]
    fn test_orb_colors_differ_by_kind() {
        assert_ne!(orb_colors(OrbKind::Attractor), orb_colors(OrbKind::Repulsor));
    }
}
