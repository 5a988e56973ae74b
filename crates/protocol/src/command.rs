use crate::{
    checksum, DeviceId, ReportingMode, WorkState, COMMAND_KIND, COMMAND_LEN, CMD_FIRMWARE,
    CMD_QUERY, CMD_REPORTING_MODE, CMD_WORKING_PERIOD, CMD_WORK_STATE, HEAD, TAIL,
};

const GET: u8 = 0;
const SET: u8 = 1;

/// Host to sensor requests.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    GetReportingMode,
    SetReportingMode(ReportingMode),
    /// Ask for one measurement, answered with a measurement frame.
    Query,
    GetWorkState,
    SetWorkState(WorkState),
    Firmware,
    GetWorkingPeriod,
    /// Minutes between measurements in active mode, 0 for continuous.
    SetWorkingPeriod(u8),
}

impl Command {
    /// Command id byte, echoed back by the sensor in its reply.
    pub fn id(&self) -> u8 {
        match self {
            Command::GetReportingMode | Command::SetReportingMode(_) => CMD_REPORTING_MODE,
            Command::Query => CMD_QUERY,
            Command::GetWorkState | Command::SetWorkState(_) => CMD_WORK_STATE,
            Command::Firmware => CMD_FIRMWARE,
            Command::GetWorkingPeriod | Command::SetWorkingPeriod(_) => CMD_WORKING_PERIOD,
        }
    }

    fn args(&self) -> [u8; 2] {
        match *self {
            Command::GetReportingMode | Command::GetWorkState | Command::GetWorkingPeriod => {
                [GET, 0]
            }
            Command::SetReportingMode(mode) => [
                SET,
                match mode {
                    ReportingMode::Active => 0,
                    ReportingMode::Query => 1,
                },
            ],
            Command::SetWorkState(state) => [
                SET,
                match state {
                    WorkState::Sleeping => 0,
                    WorkState::Working => 1,
                },
            ],
            Command::SetWorkingPeriod(minutes) => [SET, minutes],
            Command::Query | Command::Firmware => [0, 0],
        }
    }

    pub fn encode(&self, device: DeviceId) -> [u8; COMMAND_LEN] {
        let mut frame = [0u8; COMMAND_LEN];
        frame[0] = HEAD;
        frame[1] = COMMAND_KIND;
        frame[2] = self.id();
        frame[3..5].copy_from_slice(&self.args());
        frame[15..17].copy_from_slice(&device.to_bytes());
        frame[17] = checksum(&frame[2..17]);
        frame[18] = TAIL;
        frame
    }
}
