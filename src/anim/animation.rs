//! FIFO playback of segments onto a drawing context's transform

use glam::DAffine2;
use std::collections::VecDeque;

use super::clock::{Clock, SystemClock};
use super::segment::Segment;
use crate::error::{Error, Result};

/// Anything carrying a 2D affine transform that an animation can drive
pub trait TransformTarget {
    fn transform(&self) -> DAffine2;
    fn set_transform(&mut self, transform: DAffine2);
}

impl TransformTarget for DAffine2 {
    fn transform(&self) -> DAffine2 {
        *self
    }

    fn set_transform(&mut self, transform: DAffine2) {
        *self = transform;
    }
}

/// A queue of segments applied cumulatively, head first
#[derive(Debug)]
pub struct Animation<C: Clock = SystemClock> {
    queue: VecDeque<Segment>,
    dump: Vec<Segment>,
    cumulative: DAffine2,
    orig: DAffine2,
    finished: bool,
    auto_loop: bool,
    clock: C,
}

impl<C: Clock> Animation<C> {
    pub fn new(segments: Vec<Segment>, auto_loop: bool, clock: C) -> Result<Self> {
        if segments.is_empty() {
            return Err(Error::InvalidArgument(
                "animation needs at least one segment".into(),
            ));
        }
        Ok(Self {
            queue: segments.into(),
            dump: Vec::new(),
            cumulative: DAffine2::IDENTITY,
            orig: DAffine2::IDENTITY,
            finished: false,
            auto_loop,
            clock,
        })
    }

    /// Advance one frame and apply the cumulative transform to `target`.
    ///
    /// Expired head segments are settled and dumped until a live one is
    /// found, which then advances. When the queue runs dry the animation
    /// finishes (restarting immediately if auto-looping) and `target` is
    /// left at its original transform. Once finished, draws do nothing.
    pub fn draw(&mut self, target: &mut impl TransformTarget) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.orig = target.transform();
        let now = self.clock.now_millis();

        loop {
            let Some(seg) = self.queue.front_mut() else {
                self.finish();
                break;
            };
            let expired = if seg.is_started() && !seg.is_valid(now) {
                seg.settle(&mut self.cumulative);
                true
            } else {
                seg.transform(&mut self.cumulative, now)?;
                false
            };
            if !expired {
                break;
            }
            if let Some(seg) = self.queue.pop_front() {
                log::trace!("segment expired at {now}ms, {} left", self.queue.len());
                self.dump.push(seg);
            }
        }

        target.set_transform(self.orig * self.cumulative);
        Ok(())
    }

    /// Restore the transform `target` had before the last [`draw`](Self::draw)
    pub fn release(&self, target: &mut impl TransformTarget) {
        target.set_transform(self.orig);
    }

    /// Requeue every played segment and start over. Only acts once finished.
    pub fn reset_all(&mut self) {
        if !self.finished {
            return;
        }
        for mut seg in self.dump.drain(..) {
            seg.reset();
            self.queue.push_back(seg);
        }
        self.cumulative = DAffine2::IDENTITY;
        self.finished = false;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn auto_loop(&self) -> bool {
        self.auto_loop
    }

    pub fn set_auto_loop(&mut self, auto_loop: bool) {
        self.auto_loop = auto_loop;
    }

    /// The head of the queue, if any
    pub fn current_segment(&self) -> Option<&Segment> {
        self.queue.front()
    }

    /// Transform accumulated so far in the current pass
    pub fn cumulative(&self) -> DAffine2 {
        self.cumulative
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn finish(&mut self) {
        self.finished = true;
        self.cumulative = DAffine2::IDENTITY;
        log::trace!("animation finished (auto_loop={})", self.auto_loop);
        if self.auto_loop {
            self.reset_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::ManualClock;
    use glam::DVec2;
    use std::f64::consts::FRAC_PI_2;

    fn two_segments(auto_loop: bool) -> (Animation<ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        let anim = Animation::new(
            vec![
                Segment::translation(10.0, 0.0, 100).unwrap(),
                Segment::translation(0.0, 10.0, 200).unwrap(),
            ],
            auto_loop,
            clock.clone(),
        )
        .unwrap();
        (anim, clock)
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            Animation::new(vec![], false, ManualClock::new(0)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_sequencing() {
        let (mut anim, clock) = two_segments(false);
        let mut target = DAffine2::IDENTITY;
        let first = anim.current_segment().cloned();

        anim.draw(&mut target).unwrap();
        clock.set(50);
        anim.draw(&mut target).unwrap();
        assert_eq!(anim.current_segment().map(Segment::duration), Some(100));

        clock.set(101);
        anim.draw(&mut target).unwrap();
        assert_eq!(anim.current_segment().map(Segment::duration), Some(200));
        assert_ne!(anim.current_segment().cloned(), first);
        assert!(anim.current_segment().is_some_and(Segment::is_started));
        assert!(!anim.is_finished());

        clock.set(302);
        anim.draw(&mut target).unwrap();
        assert!(anim.is_finished());
        assert!(anim.current_segment().is_none());
    }

    #[test]
    fn test_finished_draw_is_noop() {
        let (mut anim, clock) = two_segments(false);
        let mut target = DAffine2::IDENTITY;
        for t in [0, 101, 302] {
            clock.set(t);
            anim.draw(&mut target).unwrap();
        }
        assert!(anim.is_finished());

        let marker = DAffine2::from_translation(DVec2::new(3.0, 4.0));
        target = marker;
        clock.set(400);
        anim.draw(&mut target).unwrap();
        assert_eq!(target, marker);
        assert!(anim.is_finished());
    }

    #[test]
    fn test_auto_loop_restarts() {
        let (mut anim, clock) = two_segments(true);
        let mut target = DAffine2::IDENTITY;
        for t in [0, 101, 302] {
            clock.set(t);
            anim.draw(&mut target).unwrap();
        }
        // Requeued immediately; nothing is running yet
        assert!(!anim.is_finished());
        let head = anim.current_segment().unwrap();
        assert_eq!(head.duration(), 100);
        assert!(!head.is_started());

        clock.set(310);
        anim.draw(&mut target).unwrap();
        assert!(anim.current_segment().is_some_and(Segment::is_started));
    }

    #[test]
    fn test_manual_reset_all() {
        let (mut anim, clock) = two_segments(false);
        let mut target = DAffine2::IDENTITY;
        anim.reset_all();
        assert_eq!(anim.current_segment().map(Segment::duration), Some(100));

        for t in [0, 101, 302] {
            clock.set(t);
            anim.draw(&mut target).unwrap();
        }
        anim.reset_all();
        assert!(!anim.is_finished());
        assert_eq!(anim.current_segment().map(Segment::duration), Some(100));
    }

    #[test]
    fn test_applies_on_top_of_target() {
        let (mut anim, clock) = two_segments(false);
        let base = DAffine2::from_translation(DVec2::new(100.0, 0.0));
        let mut target = base;
        anim.draw(&mut target).unwrap();
        anim.release(&mut target);
        clock.set(50);
        anim.draw(&mut target).unwrap();
        assert!((target.translation - DVec2::new(105.0, 0.0)).length() < 1e-9);
        anim.release(&mut target);
        assert_eq!(target, base);
    }

    #[test]
    fn test_dequeued_segment_is_settled() {
        let clock = ManualClock::new(0);
        let mut anim = Animation::new(
            vec![
                Segment::rotation(90.0, 100, None).unwrap(),
                Segment::translation(5.0, 0.0, 100).unwrap(),
            ],
            false,
            clock.clone(),
        )
        .unwrap();
        let mut target = DAffine2::IDENTITY;
        for t in [0, 33, 66, 130] {
            clock.set(t);
            anim.draw(&mut target).unwrap();
            anim.release(&mut target);
        }
        // The rotation finished between frames but still totals exactly 90°
        let x = anim.cumulative().matrix2.x_axis;
        assert!((x.y.atan2(x.x) - FRAC_PI_2).abs() < 1e-9);
        assert_eq!(anim.current_segment().map(Segment::duration), Some(100));
    }
}
