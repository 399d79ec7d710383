/// ICE candidate gathering progress reported by the media engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IceGatheringState {
    #[default]
    New,
    Gathering,
    Complete,
}

impl IceGatheringState {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}
