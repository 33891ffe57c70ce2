/// Producer/consumer coordination between the simulation writer (advances
/// the `SolarSystem`) and the drawing reader (samples it), spec.md §4.7:
/// the two roles are mutually exclusive — drawing and simulating are never
/// both active — enforced with a `Mutex`+`Condvar` monitor rather than a
/// channel, since both sides need to observe the other's current phase,
/// not just pass messages.
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::simulation::SolarSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Drawing,
    Simulating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Running,
    Paused,
    Stopped,
}

struct Shared {
    phase: Mutex<Phase>,
    condvar: Condvar,
    writer_state: Mutex<WriterState>,
}

/// Coordinates exclusive access to a `SolarSystem` between a writer thread
/// (continuously advancing the simulation) and readers (sampling it for
/// display).
pub struct Coordinator {
    shared: Arc<Shared>,
    system: Arc<Mutex<SolarSystem>>,
    writer: Option<JoinHandle<()>>,
}

/// Per-tick sleep used by the writer loop, derived from the speed slider
/// position (spec.md §4.7): 1-21ms at normal speed, 10x that in
/// single-step mode, 1ms when running fast.
pub fn writer_sleep(speed_slider: u8, single_step: bool, fast: bool) -> Duration {
    if fast {
        return Duration::from_millis(1);
    }
    let clamped = speed_slider.min(20);
    let base_ms = 21 - clamped as u64;
    let ms = if single_step { base_ms * 10 } else { base_ms };
    Duration::from_millis(ms.max(1))
}

impl Coordinator {
    pub fn new(system: SolarSystem) -> Self {
        Self {
            shared: Arc::new(Shared {
                phase: Mutex::new(Phase::Idle),
                condvar: Condvar::new(),
                writer_state: Mutex::new(WriterState::Stopped),
            }),
            system: Arc::new(Mutex::new(system)),
            writer: None,
        }
    }

    /// Enter the drawing phase, blocking until simulating stops.
    pub fn start_drawing(&self) {
        let mut phase = self.shared.phase.lock().expect("phase mutex poisoned");
        while *phase == Phase::Simulating {
            phase = self.shared.condvar.wait(phase).expect("condvar wait poisoned");
        }
        *phase = Phase::Drawing;
    }

    pub fn stop_drawing(&self) {
        let mut phase = self.shared.phase.lock().expect("phase mutex poisoned");
        if *phase == Phase::Drawing {
            *phase = Phase::Idle;
        }
        self.shared.condvar.notify_all();
    }

    /// Enter the simulating phase, blocking until drawing stops.
    pub fn start_simulating(&self) {
        let mut phase = self.shared.phase.lock().expect("phase mutex poisoned");
        while *phase == Phase::Drawing {
            phase = self.shared.condvar.wait(phase).expect("condvar wait poisoned");
        }
        *phase = Phase::Simulating;
    }

    pub fn stop_simulating(&self) {
        let mut phase = self.shared.phase.lock().expect("phase mutex poisoned");
        if *phase == Phase::Simulating {
            *phase = Phase::Idle;
        }
        self.shared.condvar.notify_all();
    }

    /// Run a single reader-side closure under the drawing phase, then
    /// release it. Convenience wrapper around start/stop_drawing.
    pub fn sample<T>(&self, f: impl FnOnce(&SolarSystem) -> T) -> T {
        self.start_drawing();
        let result = {
            let system = self.system.lock().expect("system mutex poisoned");
            f(&system)
        };
        self.stop_drawing();
        result
    }

    /// Spawn the writer thread, advancing `step_fn` once per tick while
    /// `WriterState::Running`, sleeping while `Paused`, exiting on
    /// `Stopped`.
    pub fn spawn_writer(
        &mut self,
        speed_slider: u8,
        single_step: bool,
        fast: bool,
        step_fn: impl Fn(&mut SolarSystem) + Send + 'static,
    ) {
        *self.shared.writer_state.lock().expect("writer state poisoned") = WriterState::Running;

        let shared = Arc::clone(&self.shared);
        let system = Arc::clone(&self.system);
        let sleep_for = writer_sleep(speed_slider, single_step, fast);

        let handle = thread::spawn(move || loop {
            let state = *shared.writer_state.lock().expect("writer state poisoned");
            match state {
                WriterState::Stopped => break,
                WriterState::Paused => {
                    thread::sleep(sleep_for);
                    continue;
                }
                WriterState::Running => {}
            }

            {
                let mut phase = shared.phase.lock().expect("phase mutex poisoned");
                while *phase == Phase::Drawing {
                    phase = shared.condvar.wait(phase).expect("condvar wait poisoned");
                }
                *phase = Phase::Simulating;
            }

            {
                let mut sys = system.lock().expect("system mutex poisoned");
                step_fn(&mut sys);
            }

            {
                let mut phase = shared.phase.lock().expect("phase mutex poisoned");
                *phase = Phase::Idle;
                shared.condvar.notify_all();
            }

            thread::sleep(sleep_for);
        });

        self.writer = Some(handle);
    }

    pub fn pause_writer(&self) {
        *self.shared.writer_state.lock().expect("writer state poisoned") = WriterState::Paused;
        tracing::debug!("writer paused");
    }

    pub fn resume_writer(&self) {
        *self.shared.writer_state.lock().expect("writer state poisoned") = WriterState::Running;
        tracing::debug!("writer resumed");
    }

    pub fn stop_writer(&mut self) {
        *self.shared.writer_state.lock().expect("writer state poisoned") = WriterState::Stopped;
        if let Some(handle) = self.writer.take() {
            let _ = handle.join();
        }
        tracing::debug!("writer stopped");
    }

    pub fn with_system<T>(&self, f: impl FnOnce(&mut SolarSystem) -> T) -> T {
        let mut system = self.system.lock().expect("system mutex poisoned");
        f(&mut system)
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.stop_writer();
    }
}
