//! Integer status codes for integrators that report results numerically

use super::{Error, TaskId};

#[repr(i8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Ok = 0,
    TaskCreated = 1,
    TaskCreateFailed = 2,
    TaskDeleted = 3,
    TaskDeleteFailed = 4,
    TooManyTasks = 5,
    Running = 6,
    Error = -1,
}

impl Status {
    pub const fn code(self) -> i8 {
        self as i8
    }

    pub fn of_add(result: &Result<TaskId, Error>) -> Self {
        match result {
            Ok(_) => Status::TaskCreated,
            Err(err) => Status::from(*err),
        }
    }

    pub fn of_remove(result: &Result<(), Error>) -> Self {
        match result {
            Ok(()) => Status::TaskDeleted,
            Err(err) => Status::from(*err),
        }
    }
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err {
            Error::TableFull | Error::OverflowDetected => Status::TooManyTasks,
            Error::DuplicateTask => Status::TaskCreateFailed,
            Error::InvalidSlot | Error::StaleTask => Status::TaskDeleteFailed,
            Error::InitializationFailure | Error::StartPreconditionFailed | Error::Halted => {
                Status::Error
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_the_wire_values() {
        assert_eq!(Status::Ok.code(), 0);
        assert_eq!(Status::TooManyTasks.code(), 5);
        assert_eq!(Status::Running.code(), 6);
        assert_eq!(Status::Error.code(), -1);
    }

    #[test]
    fn results_map_to_status() {
        assert_eq!(Status::of_add(&Ok(TaskId::new(0, 1))), Status::TaskCreated);
        assert_eq!(Status::of_add(&Err(Error::TableFull)), Status::TooManyTasks);
        assert_eq!(Status::of_add(&Err(Error::DuplicateTask)), Status::TaskCreateFailed);
        assert_eq!(Status::of_remove(&Ok(())), Status::TaskDeleted);
        assert_eq!(Status::of_remove(&Err(Error::StaleTask)), Status::TaskDeleteFailed);
        assert_eq!(Status::from(Error::Halted), Status::Error);
    }
}
