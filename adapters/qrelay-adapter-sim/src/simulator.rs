//! The local trajectory backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use qrelay_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, Capabilities, Counts,
    ExecutionResult, HalError, HalResult, Job, JobId, JobStatus, ValidationResult,
};
use qrelay_ir::{Circuit, ClassicalLayout, Instruction, InstructionKind, Matrix2};

use crate::noise::NoiseModel;
use crate::statevector::Statevector;

/// Widest circuit a statevector trajectory is allowed to hold.
pub const MAX_SIMULATED_QUBITS: u32 = 30;

/// Kraus sets per noisy instruction name.
type CompiledNoise = Arc<FxHashMap<String, Vec<Vec<Matrix2>>>>;

/// Settings for a [`SimulatorBackend`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Widest circuit accepted, never more than [`MAX_SIMULATED_QUBITS`].
    pub max_qubits: u32,
    /// Base seed. The `k`-th job on a backend uses `seed + k`; `None` seeds
    /// every job from entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub noise_model: NoiseModel,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: 20,
            seed: None,
            noise_model: NoiseModel::new(),
        }
    }
}

impl SimulatorConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_noise_model(mut self, noise_model: NoiseModel) -> Self {
        self.noise_model = noise_model;
        self
    }

    fn width_limit(&self) -> u32 {
        self.max_qubits.min(MAX_SIMULATED_QUBITS)
    }
}

struct Entry {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local noisy simulator.
///
/// Each shot is its own statevector trajectory. Measurements collapse the
/// state and write classical bits, conditional gates read them back, and
/// every noise channel samples a single Kraus branch. Jobs run to completion
/// inside `submit`.
pub struct SimulatorBackend {
    name: String,
    config: SimulatorConfig,
    capabilities: Capabilities,
    noise: CompiledNoise,
    jobs: Mutex<FxHashMap<JobId, Entry>>,
    submitted: AtomicU64,
}

impl SimulatorBackend {
    /// An ideal simulator with default settings.
    pub fn new() -> Self {
        Self::with_config(SimulatorConfig::default())
    }

    pub fn with_config(config: SimulatorConfig) -> Self {
        let mut capabilities = Capabilities::simulator(config.width_limit());
        if let Some(profile) = config.noise_model.profile() {
            capabilities = capabilities.with_noise_profile(profile);
        }
        Self {
            name: "simulator".into(),
            noise: Arc::new(config.noise_model.compile()),
            capabilities,
            config,
            jobs: Mutex::new(FxHashMap::default()),
            submitted: AtomicU64::new(0),
        }
    }

    fn next_rng(&self) -> StdRng {
        let k = self.submitted.fetch_add(1, Ordering::Relaxed);
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(k)),
            None => StdRng::from_entropy(),
        }
    }

    fn check_submission(&self, circuit: &Circuit, shots: u32) -> HalResult<()> {
        let max_shots = self.capabilities.max_shots;
        if shots == 0 || shots > max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} is outside 1..={max_shots}"
            )));
        }
        let available = self.config.width_limit();
        if circuit.num_qubits() > available as usize {
            return Err(HalError::CircuitTooLarge {
                required: circuit.num_qubits(),
                available,
            });
        }
        Ok(())
    }

    fn jobs(&self) -> MutexGuard<'_, FxHashMap<JobId, Entry>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// A circuit flattened for one job, owned so it can move to a blocking
/// thread.
struct Trajectories {
    program: Vec<Instruction>,
    layout: ClassicalLayout,
    num_qubits: usize,
    num_clbits: usize,
    noise: CompiledNoise,
}

impl Trajectories {
    fn new(circuit: &Circuit, noise: CompiledNoise) -> Self {
        Self {
            program: circuit.dag().topological_ops().map(|(_, inst)| inst.clone()).collect(),
            layout: circuit.classical_layout(),
            num_qubits: circuit.num_qubits(),
            num_clbits: circuit.num_clbits(),
            noise,
        }
    }

    fn run(&self, shots: u32, mut rng: StdRng) -> ExecutionResult {
        let start = Instant::now();
        debug!(
            qubits = self.num_qubits,
            ops = self.program.len(),
            shots,
            "simulating"
        );

        let mut counts = Counts::new();
        for _ in 0..shots {
            let bits = self.run_shot(&mut rng);
            counts.insert(self.layout.format_outcome(&bits), 1);
        }

        let elapsed = start.elapsed();
        debug!(?elapsed, distinct = counts.len(), "simulation finished");
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        ExecutionResult::new(counts, shots).with_execution_time(millis)
    }

    fn run_shot(&self, rng: &mut StdRng) -> Vec<bool> {
        let mut sv = Statevector::new(self.num_qubits);
        let mut bits = vec![false; self.num_clbits];

        for inst in &self.program {
            let qubits: Vec<usize> = inst.qubits.iter().map(|q| q.0 as usize).collect();
            match &inst.kind {
                InstructionKind::Gate(gate) => {
                    let fires = gate
                        .condition
                        .as_ref()
                        .is_none_or(|cond| read_value(&bits, inst) == cond.value);
                    if !fires {
                        // Skipped gates carry no gate noise.
                        continue;
                    }
                    sv.apply_gate(&gate.kind, &qubits);
                }
                InstructionKind::Measure => {
                    for (&q, c) in qubits.iter().zip(&inst.clbits) {
                        bits[c.0 as usize] = sv.measure(q, rng);
                    }
                }
                InstructionKind::Reset => sv.reset(qubits[0], rng),
                InstructionKind::Barrier | InstructionKind::Delay { .. } => {}
                InstructionKind::NoiseChannel { channel } => {
                    sv.apply_kraus(qubits[0], &channel.kraus_operators(), rng);
                }
            }

            for ops in self.noise.get(inst.name()).into_iter().flatten() {
                for &q in &qubits {
                    sv.apply_kraus(q, ops, rng);
                }
            }
        }

        bits
    }
}

/// The bits a conditional gate reads, as an integer with the first bit
/// least significant.
fn read_value(bits: &[bool], inst: &Instruction) -> u64 {
    inst.clbits
        .iter()
        .enumerate()
        .filter(|(_, c)| bits[c.0 as usize])
        .fold(0, |acc, (i, _)| acc | (1 << i))
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::local())
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let mut reasons = vec![];
        let limit = self.config.width_limit();
        if circuit.num_qubits() > limit as usize {
            reasons.push(format!("{} qubits exceed the limit of {limit}", circuit.num_qubits()));
        }
        for (_, inst) in circuit.dag().topological_ops() {
            match &inst.kind {
                InstructionKind::Gate(gate)
                    if !self.capabilities.gate_set.contains(gate.name()) =>
                {
                    reasons.push(format!("unsupported gate '{}'", gate.name()));
                }
                InstructionKind::NoiseChannel { channel } => {
                    if let Err(e) = channel.clone().validated() {
                        reasons.push(e.to_string());
                    }
                }
                _ => {}
            }
        }

        Ok(if reasons.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { reasons }
        })
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        self.check_submission(circuit, shots)?;

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let mut job = Job::new(job_id.clone(), self.name.clone(), shots);
        job.transition(JobStatus::Running);
        self.jobs().insert(job_id.clone(), Entry { job, result: None });
        debug!(job = %job_id, "job started");

        let work = Trajectories::new(circuit, Arc::clone(&self.noise));
        let rng = self.next_rng();
        let outcome = tokio::task::spawn_blocking(move || work.run(shots, rng)).await;

        if let Some(entry) = self.jobs().get_mut(&job_id) {
            match outcome {
                Ok(result) => {
                    entry.result = Some(result);
                    entry.job.transition(JobStatus::Completed);
                }
                Err(e) => {
                    warn!(job = %job_id, error = %e, "simulation task died");
                    entry.job.transition(JobStatus::Failed(e.to_string()));
                }
            }
        }

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.jobs()
            .get(job_id)
            .map(|entry| entry.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.jobs();
        let entry = jobs
            .get(job_id)
            .ok_or_else(|| HalError::JobNotFound(job_id.clone()))?;
        match (&entry.job.status, &entry.result) {
            (JobStatus::Completed, Some(result)) => Ok(result.clone()),
            (JobStatus::Failed(msg), _) => Err(HalError::JobFailed(msg.clone())),
            (JobStatus::Cancelled, _) => Err(HalError::JobCancelled),
            (status, _) => Err(HalError::ResultNotReady {
                job: job_id.clone(),
                status: status.clone(),
            }),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.jobs();
        let entry = jobs
            .get_mut(job_id)
            .ok_or_else(|| HalError::JobNotFound(job_id.clone()))?;
        entry.job.transition(JobStatus::Cancelled);
        Ok(())
    }
}

impl BackendFactory for SimulatorBackend {
    /// Reads the extras `max_qubits`, `seed` and `noise_model`, the last as a
    /// serialized [`NoiseModel`].
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.extra_u64("max_qubits") {
            None => SimulatorConfig::default().max_qubits,
            Some(n) => u32::try_from(n)
                .ok()
                .filter(|n| (1..=MAX_SIMULATED_QUBITS).contains(n))
                .ok_or_else(|| {
                    HalError::Configuration(format!(
                        "max_qubits must be in 1..={MAX_SIMULATED_QUBITS}, got {n}"
                    ))
                })?,
        };
        let noise_model = match config.extra.get("noise_model") {
            Some(value) => serde_json::from_value(value.clone())?,
            None => NoiseModel::new(),
        };

        let mut backend = Self::with_config(SimulatorConfig {
            max_qubits,
            seed: config.extra_u64("seed"),
            noise_model,
        });
        backend.name = config.name;
        Ok(backend)
    }
}
