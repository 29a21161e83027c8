//! Request/response boundary for the HTTP layer.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::{validate_config, TurntableConfig};
use crate::error::Result;
use crate::motion::{parse_query, MotionPlanner, MotionRequest, Report, ReportBuilder, SequenceExecutor};
use crate::motor::{Clock, PulseGenerator};

/// Serves motion requests one at a time.
///
/// Each call parses, plans, executes and reports a single request to
/// completion before returning; `&mut self` rules out overlapping requests.
pub struct MotionService<P, EN, C, D>
where
    P: PulseGenerator,
    EN: OutputPin,
    C: Clock,
    D: DelayNs,
{
    planner: MotionPlanner,
    reports: ReportBuilder,
    executor: SequenceExecutor<P, EN, C, D>,
    last_report: Option<Report>,
}

impl<P, EN, C, D> MotionService<P, EN, C, D>
where
    P: PulseGenerator,
    EN: OutputPin,
    C: Clock,
    D: DelayNs,
{
    /// Create a service for a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the validation error if `config` is out of range.
    pub fn new(config: &TurntableConfig, pulses: P, enable: EN, clock: C, delay: D) -> Result<Self> {
        validate_config(config)?;

        let constants = config.constants();
        Ok(Self {
            planner: MotionPlanner::new(constants, config.limits),
            reports: ReportBuilder::new(constants),
            executor: SequenceExecutor::new(pulses, enable, clock, delay, config),
            last_report: None,
        })
    }

    /// Execute a request given as submitted form fields.
    ///
    /// # Errors
    ///
    /// Returns a request error, without touching the motor, when a required
    /// field is missing or malformed. Returns a motor error if a pin fails.
    pub fn execute<'a, I>(&mut self, params: I) -> Result<Report>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let request = match MotionRequest::from_params(params) {
            Ok(request) => request,
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("request rejected: {}", defmt::Debug2Format(&e));

                return Err(e.into());
            }
        };

        self.run(&request)
    }

    /// Execute a request given as a raw `key=value&...` form string.
    pub fn execute_query(&mut self, query: &str) -> Result<Report> {
        self.execute(parse_query(query))
    }

    /// Plan, execute and report an already-parsed request.
    pub fn run(&mut self, request: &MotionRequest) -> Result<Report> {
        let plan = self.planner.plan(request)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "request: {} steps x{}, {} warnings",
            plan.step_delta.0,
            request.repetitions,
            plan.warnings.len()
        );

        let result = self.executor.execute(request, &plan)?;
        let report = self.reports.build(request, &plan, &result);
        self.last_report = Some(report.clone());

        Ok(report)
    }

    /// Most recent report, if any request has completed.
    #[inline]
    pub fn last_report(&self) -> Option<&Report> {
        self.last_report.as_ref()
    }

    /// Planner in use.
    #[inline]
    pub fn planner(&self) -> &MotionPlanner {
        &self.planner
    }

    /// Executor in use.
    #[inline]
    pub fn executor(&self) -> &SequenceExecutor<P, EN, C, D> {
        &self.executor
    }
}
