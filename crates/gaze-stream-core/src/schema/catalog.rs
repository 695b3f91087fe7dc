//! Static schema declarations for every known stream and event variant.
//!
//! These mirror the columns of the device export. The declarations are a
//! data-shape statement, not logic: each function returns the column list
//! the recording format documents for that variant, and `conform` does the
//! actual casting.
//!
//! Episode id columns (`fixation id`, `blink id`, `saccade id`) are
//! nullable Int32: a gaze row that falls outside any fixation carries a
//! null id. Episode bounds and durations are nullable Int64, matching the
//! export's integer columns that may be blank.

use crate::schema::{ColumnDef, ColumnType, StreamSchema};
use crate::table::TIMESTAMP_COLUMN;

fn required(name: &str, column_type: ColumnType) -> ColumnDef {
    ColumnDef::required(name, column_type)
}

fn nullable(name: &str, column_type: ColumnType) -> ColumnDef {
    ColumnDef::nullable(name, column_type)
}

/// Gaze stream: screen-space gaze point, worn flag, episode ids, and the
/// spherical gaze direction.
pub fn gaze() -> StreamSchema {
    StreamSchema {
        columns: vec![
            required(TIMESTAMP_COLUMN, ColumnType::TimestampNs),
            required("gaze x [px]", ColumnType::Float64),
            required("gaze y [px]", ColumnType::Float64),
            required("worn", ColumnType::Bool),
            nullable("fixation id", ColumnType::Int32),
            nullable("blink id", ColumnType::Int32),
            required("azimuth [deg]", ColumnType::Float64),
            required("elevation [deg]", ColumnType::Float64),
        ],
    }
}

/// 3D eye states stream: pupil diameters, eyeball centers, optical axes.
pub fn eye_states() -> StreamSchema {
    StreamSchema {
        columns: vec![
            required(TIMESTAMP_COLUMN, ColumnType::TimestampNs),
            required("pupil diameter left [mm]", ColumnType::Float64),
            required("pupil diameter right [mm]", ColumnType::Float64),
            required("eyeball center left x [mm]", ColumnType::Float64),
            required("eyeball center left y [mm]", ColumnType::Float64),
            required("eyeball center left z [mm]", ColumnType::Float64),
            required("eyeball center right x [mm]", ColumnType::Float64),
            required("eyeball center right y [mm]", ColumnType::Float64),
            required("eyeball center right z [mm]", ColumnType::Float64),
            required("optical axis left x", ColumnType::Float64),
            required("optical axis left y", ColumnType::Float64),
            required("optical axis left z", ColumnType::Float64),
            required("optical axis right x", ColumnType::Float64),
            required("optical axis right y", ColumnType::Float64),
            required("optical axis right z", ColumnType::Float64),
        ],
    }
}

/// IMU stream: gyroscope, accelerometer, fused orientation.
pub fn imu() -> StreamSchema {
    StreamSchema {
        columns: vec![
            required(TIMESTAMP_COLUMN, ColumnType::TimestampNs),
            required("gyro x [deg/s]", ColumnType::Float64),
            required("gyro y [deg/s]", ColumnType::Float64),
            required("gyro z [deg/s]", ColumnType::Float64),
            required("acceleration x [g]", ColumnType::Float64),
            required("acceleration y [g]", ColumnType::Float64),
            required("acceleration z [g]", ColumnType::Float64),
            required("roll [deg]", ColumnType::Float64),
            required("pitch [deg]", ColumnType::Float64),
            required("yaw [deg]", ColumnType::Float64),
            required("quaternion w", ColumnType::Float64),
            required("quaternion x", ColumnType::Float64),
            required("quaternion y", ColumnType::Float64),
            required("quaternion z", ColumnType::Float64),
        ],
    }
}

/// Blink episodes.
pub fn blinks() -> StreamSchema {
    StreamSchema {
        columns: vec![
            nullable("blink id", ColumnType::Int32),
            nullable("start timestamp [ns]", ColumnType::Int64),
            nullable("end timestamp [ns]", ColumnType::Int64),
            nullable("duration [ms]", ColumnType::Int64),
        ],
    }
}

/// Fixation episodes with centroid position and direction.
pub fn fixations() -> StreamSchema {
    StreamSchema {
        columns: vec![
            nullable("fixation id", ColumnType::Int32),
            nullable("start timestamp [ns]", ColumnType::Int64),
            nullable("end timestamp [ns]", ColumnType::Int64),
            nullable("duration [ms]", ColumnType::Int64),
            required("fixation x [px]", ColumnType::Float64),
            required("fixation y [px]", ColumnType::Float64),
            required("azimuth [deg]", ColumnType::Float64),
            required("elevation [deg]", ColumnType::Float64),
        ],
    }
}

/// Saccade episodes with amplitude and velocity summaries.
pub fn saccades() -> StreamSchema {
    StreamSchema {
        columns: vec![
            nullable("saccade id", ColumnType::Int32),
            nullable("start timestamp [ns]", ColumnType::Int64),
            nullable("end timestamp [ns]", ColumnType::Int64),
            nullable("duration [ms]", ColumnType::Int64),
            required("amplitude [px]", ColumnType::Float64),
            required("amplitude [deg]", ColumnType::Float64),
            required("mean velocity [px/s]", ColumnType::Float64),
            required("peak velocity [px/s]", ColumnType::Float64),
        ],
    }
}

/// User-annotated event markers.
pub fn events() -> StreamSchema {
    StreamSchema {
        columns: vec![
            nullable(TIMESTAMP_COLUMN, ColumnType::Int64),
            required("name", ColumnType::Utf8),
            required("type", ColumnType::Utf8),
        ],
    }
}
