/// Notifications queued by [`crate::CameraModel`] for its owner.
///
/// Every mutating call queues at most one `Changed`, after the mutation is
/// complete. Drain with [`crate::CameraModel::take_events`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraEvent {
    Changed,
    CullMaskChanged(u32),
}
