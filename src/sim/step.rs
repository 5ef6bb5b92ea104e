//! Fixed timestep simulation step
//!
//! Advances every body, then separates overlapping pairs.

use crate::physics::{CollisionAxis, Force};
use crate::settings::Settings;
use crate::world::{Rect2D, Resolution, World2D};

use super::body::Body;

/// Two bodies found overlapping after integration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Body indices, lower first
    pub pair: (usize, usize),
    /// Overlap of the bounding boxes before resolution
    pub overlap: Rect2D,
}

/// What happened during one step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Bodies that bounced off the view edges, by index
    pub wall_hits: Vec<(usize, CollisionAxis)>,
    pub contacts: Vec<Contact>,
    /// Contacts that could not be separated this step; these still overlap
    pub unresolved: Vec<(usize, usize)>,
}

impl StepReport {
    /// Index pairs of every contact
    pub fn contact_pairs(&self) -> Vec<(usize, usize)> {
        self.contacts.iter().map(|c| c.pair).collect()
    }
}

/// Advance `bodies` by one `settings.fixed_dt` tick.
///
/// Bodies are updated in index order, then every overlapping pair `(i, j)`
/// with `i < j` is pushed apart with [`CollisionModel::resolve_bounded`].
/// Pairs that fail to separate keep their positions from before the
/// resolve attempt and are listed in [`StepReport::unresolved`].
///
/// [`CollisionModel::resolve_bounded`]: crate::world::CollisionModel::resolve_bounded
pub fn step(
    bodies: &mut [Body],
    world: &World2D,
    settings: &Settings,
    forces: &[Force],
) -> StepReport {
    let mut report = StepReport::default();
    let dt = settings.fixed_dt;

    for (i, body) in bodies.iter_mut().enumerate() {
        if let Some(axis) = body.update(dt, world, forces) {
            log::trace!("body {i} hit the view edge ({axis:?})");
            report.wall_hits.push((i, axis));
        }
    }

    for j in 1..bodies.len() {
        let (head, tail) = bodies.split_at_mut(j);
        let b = &mut tail[0];
        for (i, a) in head.iter_mut().enumerate() {
            let Some(overlap) = a.collision(b) else {
                continue;
            };
            report.contacts.push(Contact {
                pair: (i, j),
                overlap,
            });

            let model = a.shared_model();
            let other = b.shared_model();
            match model.resolve_bounded(
                &mut a.position,
                &mut b.position,
                &other,
                a.physics.velocity(),
                b.physics.velocity(),
                settings.resolve_velocity_factor,
                settings.resolution_threshold,
                settings.max_resolve_iterations,
            ) {
                Ok(Resolution::Resolved { iterations }) => {
                    log::debug!("separated bodies {i} and {j} in {iterations} iterations");
                }
                Ok(Resolution::Separate) => {}
                Err(e) => {
                    log::warn!("bodies {i} and {j} still overlap: {e}");
                    report.unresolved.push((i, j));
                }
            }
        }
    }

    report.contacts.sort_unstable_by_key(|c| c.pair);
    report.unresolved.sort_unstable();
    report
}
