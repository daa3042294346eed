//! Animators - who advances time and where heights are recomputed
//!
//! - `ServerAnimator`: ticks the clock and publishes every frame
//! - `ClientAnimator`: publishes the scene once, the renderer animates it

mod boundary;
mod client;
#[cfg(feature = "cli")]
mod driver;
mod server;

pub use boundary::{Delivery, LatestSlot, RendererBoundary, SlotReceiver, SyncBoundary};
pub use client::{ClientAnimator, EmitOutcome};
#[cfg(feature = "cli")]
pub use driver::{run_server_driven, Shutdown};
pub use server::{AnimatorStats, ServerAnimator, TickOutcome};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AnimationConfig, FieldParams, GridSpec};
    use crate::renderer::{FrameLoop, PointBuffer};

    /// Parameter table both sides must agree on
    const CONFORMANCE_TABLE: &[(f32, f32, f64)] = &[
        (1.0, 1.0, 0.05),
        (0.5, 0.0, 0.1),
        (2.5, -1.25, 0.016),
        (1.0, 3.0, 1.0 / 60.0),
    ];

    fn config(omega: f32, offset: f32, dt: f64) -> AnimationConfig {
        AnimationConfig {
            grid: GridSpec::new(-3.0, 3.0, 12),
            field: FieldParams { omega, offset, dt },
            ..Default::default()
        }
    }

    #[test]
    fn server_and_client_driven_heights_agree() {
        for &(omega, offset, dt) in CONFORMANCE_TABLE {
            let config = config(omega, offset, dt);

            let mut server = ServerAnimator::new(&config).unwrap();
            let mut server_side = RendererBoundary::detached();
            server_side
                .attach(PointBuffer::new(), &server.snapshot().unwrap(), config.point_size)
                .unwrap();

            let mut client = ClientAnimator::new(&config).unwrap();
            let mut client_side = RendererBoundary::detached();
            client_side.attach_uninitialized(PointBuffer::new());
            assert_eq!(client.emit(&mut client_side).unwrap(), EmitOutcome::Emitted);
            let mut frame_loop = FrameLoop::new(client.setup()).unwrap();

            // initial scenes match
            assert_eq!(
                server_side.renderer().unwrap().positions(),
                client_side.renderer().unwrap().positions(),
            );

            for step in 1..=40 {
                server.tick(&mut server_side).unwrap();
                frame_loop.step(client_side.renderer_mut().unwrap()).unwrap();

                let a = server_side.renderer().unwrap().positions();
                let b = client_side.renderer().unwrap().positions();
                assert_eq!(a, b, "omega={omega} offset={offset} dt={dt} step={step}");
                assert_eq!(server.time(), frame_loop.time());
            }
        }
    }

    #[test]
    fn client_driven_renderer_animates_without_further_pushes() {
        let config = config(1.0, 1.0, 0.05);
        let mut client = ClientAnimator::new(&config).unwrap();
        let mut boundary = RendererBoundary::detached();
        boundary.attach_uninitialized(PointBuffer::new());
        client.emit(&mut boundary).unwrap();

        let mut frame_loop = FrameLoop::new(client.setup()).unwrap();
        let renderer = boundary.renderer_mut().unwrap();
        let before = renderer.positions().to_vec();
        // display slightly slower than the redraw rate: every callback advances
        let period = frame_loop.frame_interval_ms() + 1.0;
        for i in 1..=10 {
            assert!(frame_loop.on_frame(i as f64 * period, renderer).unwrap());
        }
        assert_eq!(frame_loop.steps(), 10);
        assert_ne!(renderer.positions(), before.as_slice());
        assert_eq!(client.emit(&mut boundary).unwrap(), EmitOutcome::AlreadyEmitted);
    }

    #[test]
    fn independent_sessions_keep_their_own_clocks() {
        let config = config(1.0, 1.0, 0.05);
        let mut a = ServerAnimator::new(&config).unwrap();
        let mut b = ServerAnimator::new(&config).unwrap();
        let mut slot_a = LatestSlot::new();
        let mut slot_b = LatestSlot::new();
        let _rx_a = slot_a.attach();
        for _ in 0..3 {
            a.tick(&mut slot_a).unwrap();
        }
        b.tick(&mut slot_b).unwrap();
        assert_eq!(a.time(), 3.0 * 0.05);
        assert_eq!(b.time(), 0.05);
        assert_eq!(b.stats().dropped, 1);
    }
}
