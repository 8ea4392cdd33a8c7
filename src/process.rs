//! 실행/일시정지/정지 표시 상태. 화면 문구만 바꾸며 계산에는 관여하지 않는다.

use crate::i18n::keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// 상태 문구의 표시 색조.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Info,
    Warning,
}

impl ProcessState {
    pub fn start(self) -> Self {
        ProcessState::Running
    }

    pub fn pause(self) -> Self {
        ProcessState::Paused
    }

    pub fn stop(self) -> Self {
        ProcessState::Stopped
    }

    /// 상태 문구의 번역 키.
    pub fn status_key(self) -> &'static str {
        match self {
            ProcessState::Running => keys::PROCESS_RUNNING,
            ProcessState::Paused => keys::PROCESS_PAUSED,
            ProcessState::Stopped => keys::PROCESS_STOPPED,
        }
    }

    pub fn tone(self) -> StatusTone {
        match self {
            ProcessState::Running => StatusTone::Success,
            ProcessState::Paused => StatusTone::Info,
            ProcessState::Stopped => StatusTone::Warning,
        }
    }
}
