//! The session aggregate: one learner's canvas, lives, configuration and
//! animation state, mutated from a single thread.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rc_core::{ComponentKind, Point};
use rc_graph::{CycleGraph, Lives, PressTarget, ProposalOutcome};
use rc_remote::{ConfigureRequest, RemoteResult, SimulationResult, SimulationSource};
use rc_sim::{ParticleStream, Phase, PhaseDriver, TickOutcome};
use tracing::{debug, info, warn};

use crate::config_worker::ConfigWorker;
use crate::draw::DrawList;
use crate::error::{AppError, AppResult};
use crate::options::SessionOptions;
use crate::signals::Signal;
use crate::table::DataRow;

/// Pointer distance under which a pipe's midpoint counts as hovered.
const CONNECTION_HOVER_RADIUS: f64 = 50.0;

/// Where the configuration lifecycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStatus {
    NotConfigured,
    /// A request is in flight; `reconfiguring` if earlier data exists.
    Fetching { reconfiguring: bool },
    Configured,
}

/// Aggregate figures shown when hovering a component while running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComponentSummary {
    Evaporator { heat_absorbed: Option<f64> },
    Compressor { work: Option<f64>, cop: Option<f64> },
    Condenser { heat_rejected: Option<f64> },
}

impl std::fmt::Display for ComponentSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn value(v: Option<f64>) -> String {
            v.filter(|x| x.is_finite())
                .map(|x| format!("{x:.2}"))
                .unwrap_or_else(|| "N/A".to_string())
        }
        match self {
            ComponentSummary::Evaporator { heat_absorbed } => {
                write!(f, "Heat absorbed: {} kW", value(*heat_absorbed))
            }
            ComponentSummary::Compressor { work, cop } => {
                write!(f, "Compressor work: {} kW, COP: {}", value(*work), value(*cop))
            }
            ComponentSummary::Condenser { heat_rejected } => {
                write!(f, "Heat rejected: {} kW", value(*heat_rejected))
            }
        }
    }
}

pub struct Session {
    options: SessionOptions,
    graph: CycleGraph,
    driver: PhaseDriver,
    stream: ParticleStream,
    rng: StdRng,
    running: bool,
    config: ConfigStatus,
    request: Option<ConfigureRequest>,
    pending: Option<ConfigureRequest>,
    result: Option<SimulationResult>,
    history: Vec<DataRow>,
    signals: Vec<Signal>,
}

impl Session {
    pub fn new(options: SessionOptions) -> AppResult<Self> {
        options.validate()?;
        let stream = ParticleStream::new(options.particles.clone())?;
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            graph: CycleGraph::new(options.max_lives),
            driver: PhaseDriver::new(),
            stream,
            rng,
            running: false,
            config: ConfigStatus::NotConfigured,
            request: None,
            pending: None,
            result: None,
            history: Vec::new(),
            signals: Vec::new(),
            options,
        })
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn graph(&self) -> &CycleGraph {
        &self.graph
    }

    // -- canvas --------------------------------------------------------------

    pub fn place(&mut self, kind: ComponentKind, position: Point) -> AppResult<()> {
        self.graph.place(kind, position)?;
        Ok(())
    }

    /// Place with the body centred on a drop point.
    pub fn place_at_drop(&mut self, kind: ComponentKind, drop: Point) -> AppResult<()> {
        self.graph.registry_mut().place_at_drop(kind, drop)?;
        Ok(())
    }

    pub fn move_component(&mut self, kind: ComponentKind, position: Point) -> AppResult<()> {
        self.graph.registry_mut().move_to(kind, position)?;
        Ok(())
    }

    /// Propose `source -> dest`, raising the matching signals.
    ///
    /// Losing the last life stops the simulation.
    pub fn propose(
        &mut self,
        source: ComponentKind,
        dest: ComponentKind,
    ) -> AppResult<ProposalOutcome> {
        let outcome = self.graph.propose(source, dest)?;
        match outcome {
            ProposalOutcome::Accepted => {
                self.signals
                    .push(Signal::ConnectionAccepted { source, dest });
            }
            ProposalOutcome::Rejected { lives_left } => {
                self.signals
                    .push(Signal::ConnectionRejected { source, dest });
                self.signals.push(Signal::LifeLost {
                    remaining: lives_left,
                });
            }
            ProposalOutcome::GameOver => {
                self.signals
                    .push(Signal::ConnectionRejected { source, dest });
                self.signals.push(Signal::LifeLost { remaining: 0 });
                self.signals.push(Signal::GameOver);
                warn!("all lives lost; session ended");
                self.stop();
            }
            ProposalOutcome::AlreadyConnected | ProposalOutcome::Ignored => {}
        }
        Ok(outcome)
    }

    pub fn component_at(&self, p: Point) -> Option<ComponentKind> {
        self.graph.registry().component_at(p)
    }

    /// Resolve a pointer press to a component body or an outbound anchor.
    pub fn press_target(&self, p: Point) -> Option<PressTarget> {
        self.graph.registry().press_target(p)
    }

    /// Resolve a pointer release to the inbound anchor of another component.
    pub fn inbound_anchor_at(&self, p: Point, from: ComponentKind) -> Option<ComponentKind> {
        self.graph.registry().inbound_anchor_at(p, from)
    }

    /// The first connection whose midpoint is near `p`.
    pub fn connection_near(&self, p: Point) -> Option<(ComponentKind, ComponentKind)> {
        let registry = self.graph.registry();
        self.graph.connections().iter().find_map(|conn| {
            let start = registry.get(conn.source)?.anchors().outbound;
            let end = registry.get(conn.dest)?.anchors().inbound;
            (start.midpoint(end).distance(p) < CONNECTION_HOVER_RADIUS)
                .then_some((conn.source, conn.dest))
        })
    }

    // -- configuration -------------------------------------------------------

    pub fn config_status(&self) -> ConfigStatus {
        self.config
    }

    pub fn is_configured(&self) -> bool {
        self.config == ConfigStatus::Configured
    }

    /// The request behind the stored result.
    pub fn request(&self) -> Option<&ConfigureRequest> {
        self.request.as_ref()
    }

    pub fn result(&self) -> Option<&SimulationResult> {
        self.result.as_ref()
    }

    /// Validate `request` and mark a fetch as in flight.
    pub fn begin_configuration(&mut self, request: ConfigureRequest) -> AppResult<()> {
        if self.running {
            return Err(AppError::SimulationRunning);
        }
        if matches!(self.config, ConfigStatus::Fetching { .. }) {
            return Err(AppError::ConfigurationBusy);
        }
        request.validate()?;

        let reconfiguring = self.result.is_some();
        info!(
            refrigerant = %request.refrigerant,
            evaporation_temp = request.evaporation_temp,
            condensation_temp = request.condensation_temp,
            reconfiguring,
            "configuration requested"
        );
        self.pending = Some(request);
        self.config = ConfigStatus::Fetching { reconfiguring };
        Ok(())
    }

    /// Apply the outcome of the in-flight fetch.
    ///
    /// On failure a first configuration falls back to not configured and a
    /// reconfiguration keeps its previous data.
    pub fn complete_configuration(
        &mut self,
        outcome: RemoteResult<SimulationResult>,
    ) -> AppResult<()> {
        let ConfigStatus::Fetching { reconfiguring } = self.config else {
            return Err(AppError::InvalidInput(
                "no configuration request in flight".to_string(),
            ));
        };
        let request = self.pending.take();

        match outcome.and_then(SimulationResult::normalized) {
            Ok(result) => {
                info!(states = result.states.len(), reconfiguring, "configuration applied");
                self.signals.push(Signal::ConfigurationSucceeded {
                    reconfigured: reconfiguring,
                    message: result.message.clone(),
                });
                self.result = Some(result);
                self.request = request;
                self.config = ConfigStatus::Configured;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, reconfiguring, "configuration failed");
                self.signals.push(Signal::ConfigurationFailed {
                    message: e.to_string(),
                });
                self.config = if self.result.is_some() {
                    ConfigStatus::Configured
                } else {
                    ConfigStatus::NotConfigured
                };
                Err(e.into())
            }
        }
    }

    /// Fetch on the calling thread.
    pub fn configure(
        &mut self,
        source: &dyn SimulationSource,
        request: ConfigureRequest,
    ) -> AppResult<()> {
        self.begin_configuration(request.clone())?;
        let outcome = source.fetch(&request);
        self.complete_configuration(outcome)
    }

    /// Fetch on a background thread; feed the worker's answer back through
    /// [`Self::complete_configuration`].
    pub fn spawn_configuration<S>(
        &mut self,
        source: S,
        request: ConfigureRequest,
    ) -> AppResult<ConfigWorker>
    where
        S: SimulationSource + Send + 'static,
    {
        self.begin_configuration(request.clone())?;
        Ok(ConfigWorker::start(source, request))
    }

    /// Figures for the hover tooltip of `kind`; only while running.
    pub fn component_summary(&self, kind: ComponentKind) -> Option<ComponentSummary> {
        if !self.running {
            return None;
        }
        let r = self.result.as_ref()?;
        match kind {
            ComponentKind::Evaporator => Some(ComponentSummary::Evaporator {
                heat_absorbed: r.heat_absorbed,
            }),
            ComponentKind::Compressor => Some(ComponentSummary::Compressor {
                work: r.compressor_work,
                cop: r.cop,
            }),
            ComponentKind::Condenser => Some(ComponentSummary::Condenser {
                heat_rejected: r.heat_rejected,
            }),
            ComponentKind::ExpansionValve => None,
        }
    }

    /// Hover text for a pipe: what the refrigerant is doing right now.
    pub fn connection_label(&self) -> &'static str {
        if self.running {
            self.driver.current_phase().refrigerant().caption()
        } else {
            "REFRIGERANT"
        }
    }

    // -- run control ---------------------------------------------------------

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_game_over(&self) -> bool {
        self.graph.validator().is_ended()
    }

    pub fn lives(&self) -> Lives {
        self.graph.validator().lives()
    }

    pub fn cycles(&self) -> u64 {
        self.driver.cycles()
    }

    /// The phase whose pipe carries flow now.
    pub fn phase(&self) -> Phase {
        self.driver.current_phase()
    }

    /// Start the animation once every precondition holds.
    pub fn start(&mut self) -> AppResult<()> {
        match self.config {
            ConfigStatus::NotConfigured => return Err(AppError::NotConfigured),
            ConfigStatus::Fetching { .. } => return Err(AppError::ConfigurationBusy),
            ConfigStatus::Configured => {}
        }
        if self.running {
            return Err(AppError::AlreadyRunning);
        }
        if self.is_game_over() {
            return Err(AppError::GameOver);
        }
        self.graph.check_startable()?;

        self.driver.reset();
        self.history.clear();
        self.graph.clear_particles();
        self.graph.registry_mut().set_animating(true);
        self.running = true;
        info!("simulation started");
        Ok(())
    }

    /// Halt both ticks; anything already scheduled becomes a no-op.
    pub fn stop(&mut self) {
        if self.running {
            info!(cycles = self.driver.cycles(), "simulation stopped");
        }
        self.running = false;
        self.graph.registry_mut().set_animating(false);
        self.graph.clear_particles();
    }

    /// Clear the canvas and counters; configuration survives.
    pub fn reset(&mut self) {
        self.stop();
        self.graph.reset();
        self.driver.reset();
        self.history.clear();
        info!("session reset");
    }

    /// Advance the phase driver by one row.
    ///
    /// Returns `None` without touching anything when not running.
    pub fn table_tick(&mut self) -> Option<TickOutcome<DataRow>> {
        if !self.running {
            return None;
        }
        let result = self.result.as_ref();
        let outcome = self.driver.tick(|phase| {
            let state = result?.state(phase.index())?;
            DataRow::from_state(phase.index(), state, phase.next())
        });

        if let TickOutcome::Shown { row, .. } = &outcome {
            // New stage: pipes restart empty.
            self.graph.clear_particles();
            debug!(state = row.slot.name, active = row.active.description(), "row shown");
            self.history.push(row.clone());
        }
        Some(outcome)
    }

    /// Spawn and advance particles for one frame. No-op when not running.
    pub fn frame_tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let phase = self.driver.current_phase();
        self.stream
            .update_all(self.graph.connections_mut(), Some(phase), &mut self.rng);
        true
    }

    pub fn draw_list(&self) -> DrawList {
        DrawList::build(&self.graph, self.running.then(|| self.driver.current_phase()))
    }

    /// Rows shown since the last clear, oldest first.
    pub fn history(&self) -> &[DataRow] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn drain_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("running", &self.running)
            .field("config", &self.config)
            .field("components", &self.graph.registry().len())
            .field("connections", &self.graph.connections().len())
            .field("lives", &self.lives().remaining())
            .field("step", &self.driver.step())
            .field("cycles", &self.driver.cycles())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rc_core::Vec2;
    use rc_remote::{RemoteError, StatePoint};

    fn options() -> SessionOptions {
        SessionOptions {
            seed: Some(7),
            ..SessionOptions::default()
        }
    }

    fn result() -> SimulationResult {
        SimulationResult {
            states: vec![StatePoint::new(1.0, 2.0, 3.0, 4.0); 4],
            cop: Some(3.5),
            ..SimulationResult::default()
        }
    }

    #[test]
    fn first_configuration_failure_reverts() {
        let mut s = Session::new(options()).unwrap();
        s.begin_configuration(ConfigureRequest::new("R134a", -10.0, 40.0))
            .unwrap();
        assert_eq!(
            s.config_status(),
            ConfigStatus::Fetching {
                reconfiguring: false
            }
        );
        assert!(matches!(
            s.begin_configuration(ConfigureRequest::new("R134a", -10.0, 40.0)),
            Err(AppError::ConfigurationBusy)
        ));
        let err = s
            .complete_configuration(Err(RemoteError::Status { status: 500 }))
            .unwrap_err();
        assert!(matches!(err, AppError::Remote(_)));
        assert_eq!(s.config_status(), ConfigStatus::NotConfigured);
        assert_eq!(
            s.drain_signals(),
            vec![Signal::ConfigurationFailed {
                message: "HTTP error: 500".to_string()
            }]
        );
    }

    #[test]
    fn invalid_request_changes_nothing() {
        let mut s = Session::new(options()).unwrap();
        assert!(
            s.begin_configuration(ConfigureRequest::new("R134a", 40.0, -10.0))
                .is_err()
        );
        assert_eq!(s.config_status(), ConfigStatus::NotConfigured);
        assert!(s.drain_signals().is_empty());
    }

    #[test]
    fn complete_without_begin_is_rejected() {
        let mut s = Session::new(options()).unwrap();
        assert!(matches!(
            s.complete_configuration(Ok(result())),
            Err(AppError::InvalidInput(_))
        ));
        assert!(!s.is_configured());
    }

    #[test]
    fn summaries_only_while_running() {
        let mut s = Session::new(options()).unwrap();
        s.begin_configuration(ConfigureRequest::new("R134a", -10.0, 40.0))
            .unwrap();
        s.complete_configuration(Ok(result())).unwrap();
        assert!(s.component_summary(ComponentKind::Compressor).is_none());
        assert_eq!(s.connection_label(), "REFRIGERANT");

        let positions = [
            (ComponentKind::Compressor, Vec2::new(320.0, 60.0)),
            (ComponentKind::Condenser, Vec2::new(560.0, 220.0)),
            (ComponentKind::ExpansionValve, Vec2::new(320.0, 420.0)),
            (ComponentKind::Evaporator, Vec2::new(80.0, 220.0)),
        ];
        for (kind, pos) in positions {
            s.place(kind, pos).unwrap();
        }
        for kind in ComponentKind::ALL {
            s.propose(kind, kind.successor()).unwrap();
        }
        s.start().unwrap();

        let summary = s.component_summary(ComponentKind::Compressor).unwrap();
        assert_eq!(summary.to_string(), "Compressor work: N/A kW, COP: 3.50");
        assert!(s.component_summary(ComponentKind::ExpansionValve).is_none());
        assert_eq!(s.connection_label(), "COLD LIQUID");
    }

    #[test]
    fn hover_finds_pipe_midpoint() {
        let mut s = Session::new(options()).unwrap();
        s.place(ComponentKind::Compressor, Vec2::new(0.0, 0.0)).unwrap();
        s.place(ComponentKind::Condenser, Vec2::new(200.0, 0.0)).unwrap();
        s.propose(ComponentKind::Compressor, ComponentKind::Condenser)
            .unwrap();
        // Anchors (110, -20) and (180, -20).
        assert_eq!(
            s.connection_near(Vec2::new(145.0, -20.0)),
            Some((ComponentKind::Compressor, ComponentKind::Condenser))
        );
        assert_eq!(s.connection_near(Vec2::new(145.0, 200.0)), None);
    }
}
