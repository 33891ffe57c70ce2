/// Persisted simulation state: versioned, self-describing, bit-exact
/// round-trip for every observable field. Framing is `[u32 magic][u16
/// version][payload]` with a JSON payload (schema evolution across
/// versions is out of scope; a version mismatch is rejected outright).
use serde::{Deserialize, Serialize};

use crate::bodies::BodyKind;
use crate::error::{OrreryError, OrreryResult};
use crate::integrator::IntegratorKind;
use crate::simulation::SolarSystem;
use crate::time::CalendarInstant;
use crate::units::{Kilograms, Meters, Seconds};
use crate::vec3::Vector3;

const MAGIC: u32 = 0x4F52_5259; // "ORRY"
const VERSION: u16 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyState {
    pub name: String,
    pub kind: BodyKind,
    pub mass: Kilograms,
    pub radius: Meters,
    pub position: Vector3,
    pub velocity: Vector3,
    pub trajectory: Vec<Vector3>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotPayload {
    epoch: CalendarInstant,
    elapsed_seconds: f64,
    base_step_seconds: f64,
    fast_multiplier: f64,
    integrator_kind: IntegratorKind,
    bodies: Vec<BodyState>,
}

/// Serialize a `SolarSystem` to the framed snapshot format.
pub fn save(system: &SolarSystem) -> OrreryResult<Vec<u8>> {
    let payload = SnapshotPayload {
        epoch: system.epoch(),
        elapsed_seconds: system.elapsed_seconds(),
        base_step_seconds: system.base_step.value(),
        fast_multiplier: system.fast_multiplier,
        integrator_kind: system.integrator_kind(),
        bodies: system.export_bodies(),
    };
    let json = serde_json::to_vec(&payload)
        .map_err(|e| OrreryError::UnsupportedInstant(format!("snapshot serialize failed: {e}")))?;

    let mut out = Vec::with_capacity(4 + 2 + json.len());
    out.extend_from_slice(&MAGIC.to_le_bytes());
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&json);
    Ok(out)
}

/// Deserialize a framed snapshot back into a `SolarSystem`. Rejects
/// unknown magic or a version other than the one this build writes.
pub fn load(bytes: &[u8]) -> OrreryResult<SolarSystem> {
    if bytes.len() < 6 {
        return Err(OrreryError::UnsupportedInstant(
            "snapshot is too short to contain a valid header".into(),
        ));
    }
    let magic = u32::from_le_bytes(bytes[0..4].try_into().unwrap());
    if magic != MAGIC {
        return Err(OrreryError::UnsupportedInstant(format!(
            "snapshot magic mismatch: expected {MAGIC:#010x}, got {magic:#010x}"
        )));
    }
    let version = u16::from_le_bytes(bytes[4..6].try_into().unwrap());
    if version != VERSION {
        return Err(OrreryError::UnsupportedInstant(format!(
            "snapshot version {version} is not supported by this build (expects {VERSION})"
        )));
    }

    let payload: SnapshotPayload = serde_json::from_slice(&bytes[6..])
        .map_err(|e| OrreryError::UnsupportedInstant(format!("snapshot deserialize failed: {e}")))?;

    Ok(SolarSystem::from_snapshot(
        payload.epoch,
        payload.elapsed_seconds,
        Seconds(payload.base_step_seconds),
        payload.fast_multiplier,
        payload.integrator_kind,
        payload.bodies,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Era;

    fn j2000() -> CalendarInstant {
        CalendarInstant::new(Era::Ad, 2000, 1, 1, 12, 0, 0, 0).unwrap()
    }

    #[test]
    fn round_trip_preserves_positions_exactly() {
        let system = SolarSystem::initialize(j2000()).unwrap();
        let bytes = save(&system).unwrap();
        let restored = load(&bytes).unwrap();

        for name in ["Sun", "Earth", "Jupiter"] {
            let original = system.get_position(name).unwrap();
            let loaded = restored.get_position(name).unwrap();
            assert_eq!(original.x.to_bits(), loaded.x.to_bits());
            assert_eq!(original.y.to_bits(), loaded.y.to_bits());
            assert_eq!(original.z.to_bits(), loaded.z.to_bits());
        }
    }

    #[test]
    fn round_trip_preserves_elapsed_time_and_integrator_kind() {
        let mut system = SolarSystem::initialize(j2000()).unwrap();
        system.set_integrator_kind(IntegratorKind::PpnGr);
        system.advance_forward(5, false).unwrap();

        let bytes = save(&system).unwrap();
        let restored = load(&bytes).unwrap();

        assert_eq!(restored.integrator_kind(), IntegratorKind::PpnGr);
        assert_eq!(restored.elapsed_seconds(), system.elapsed_seconds());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = save(&SolarSystem::initialize(j2000()).unwrap()).unwrap();
        bytes[0] = 0x00;
        assert!(load(&bytes).is_err());
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut bytes = save(&SolarSystem::initialize(j2000()).unwrap()).unwrap();
        bytes[4] = 0xFF;
        bytes[5] = 0xFF;
        assert!(load(&bytes).is_err());
    }

    #[test]
    fn rejects_truncated_header() {
        assert!(load(&[1, 2, 3]).is_err());
    }
}
