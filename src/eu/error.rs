/// Errors reported by the multi-device waits and the DMA tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EuError {
    /// Polling budget exhausted before the requested events were all observed.
    ///
    /// Carries no partial result: bits observed (and cleared) before the
    /// budget ran out are not reported.
    Timeout,
    /// Wait requested for an empty event set.
    EmptyMask,
    /// DMA channel index outside the 16 hardware channels.
    InvalidChannel,
    /// Transfer id 0, which the hardware never hands out.
    InvalidTransfer,
    /// Software event id outside the 8 hardware lines.
    InvalidSwEvent,
}

impl core::fmt::Display for EuError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EuError::Timeout => write!(f, "timed out waiting for events"),
            EuError::EmptyMask => write!(f, "wait requested for an empty event set"),
            EuError::InvalidChannel => write!(f, "dma channel index out of range"),
            EuError::InvalidTransfer => write!(f, "transfer id 0 is never issued"),
            EuError::InvalidSwEvent => write!(f, "software event id out of range"),
        }
    }
}
