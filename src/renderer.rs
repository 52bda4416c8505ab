//! Rendering and input seams.
//!
//! The scheduling core is display-agnostic (spec §6 Non-goals exclude a
//! graphical front end); these traits exist so a real renderer can be
//! plugged in later without touching `scheduler.rs`. `NullRenderer` is the
//! stub used by the headless binary and by every test.

use crate::particle::ParticleStore;
use crate::wall::WallSet;

/// A sink for simulation state, polled once per frame by `main.rs`.
pub trait Renderer {
    /// Draws the current state of the world.
    fn draw(&mut self, particles: &ParticleStore, walls: &WallSet, sim_time: f32);
    /// Repositions the renderer's viewport/cursor, if it has one.
    fn move_to(&mut self, x: f32, y: f32);
    /// Clears whatever was previously drawn.
    fn clear(&mut self);
    /// Sets the background color/fill used by `clear`.
    fn set_background(&mut self, r: u8, g: u8, b: u8);
}

/// A source of user input, polled once per frame by `main.rs`.
pub trait InputSource {
    /// Returns a key pressed since the last poll, if any.
    fn poll_key(&mut self) -> Option<char>;
    /// Returns a mouse click position, if any occurred since the last poll.
    fn poll_click(&mut self) -> Option<(f32, f32)>;
}

/// A `Renderer`/`InputSource` that does nothing. Used for headless runs
/// and integration tests that only care about scheduler state.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _particles: &ParticleStore, _walls: &WallSet, _sim_time: f32) {}
    fn move_to(&mut self, _x: f32, _y: f32) {}
    fn clear(&mut self) {}
    fn set_background(&mut self, _r: u8, _g: u8, _b: u8) {}
}

impl InputSource for NullRenderer {
    fn poll_key(&mut self) -> Option<char> {
        None
    }
    fn poll_click(&mut self) -> Option<(f32, f32)> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleStore;

    #[test]
    fn null_renderer_never_reports_input() {
        let mut r = NullRenderer;
        assert_eq!(r.poll_key(), None);
        assert_eq!(r.poll_click(), None);
    }

    #[test]
    fn null_renderer_draw_does_not_panic() {
        let mut r = NullRenderer;
        let store = ParticleStore::new(vec![]);
        let walls = WallSet::with_boundary(10.0, 10.0);
        r.draw(&store, &walls, 0.0);
        r.clear();
        r.move_to(1.0, 1.0);
        r.set_background(0, 0, 0);
    }
}
