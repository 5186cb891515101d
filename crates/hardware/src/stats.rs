//! Simulation statistics collection and reporting.
//!
//! This module tracks what happened during a run. It provides:
//! 1. **Cycles and IPC:** Total cycles, retired instructions, and derived throughput.
//! 2. **Instruction mix:** Retired counts by class (integer, float, branch, load, store, other).
//! 3. **Stalls:** Front-end cycles lost to data and control hazards, plus stall-queue traffic.
//! 4. **Output:** The plain-text report, selectable detail sections, and JSON.

use std::fmt;

use serde::Serialize;

use crate::isa::InstClass;

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"instruction_mix"`, `"stalls"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "instruction_mix", "stalls"];

/// Counters gathered by the cycle stepper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Total simulated cycles.
    pub cycles: u64,

    /// Integer instructions retired.
    pub inst_int: u64,
    /// Floating-point instructions retired.
    pub inst_float: u64,
    /// Branch instructions retired.
    pub inst_branch: u64,
    /// Load instructions retired.
    pub inst_load: u64,
    /// Store instructions retired.
    pub inst_store: u64,
    /// Instructions of any other class retired.
    pub inst_other: u64,

    /// Instructions admitted into FETCH.
    pub instructions_fetched: u64,

    /// Cycles the front end was frozen by a data hazard.
    pub stalls_data: u64,
    /// Cycles fetch was blocked by an unresolved branch.
    pub stalls_control: u64,
    /// Instructions pushed onto the EXECUTE stall queue by arbitration.
    pub ex_deferrals: u64,
    /// Instructions pushed onto the MEMORY stall queue by arbitration.
    pub mem_deferrals: u64,
    /// Producers pushed out of a DECODE bundle that also held their consumer.
    pub intra_bundle_squashes: u64,
}

impl SimStats {
    /// Counts one retired instruction of `class`.
    pub const fn record_retire(&mut self, class: InstClass) {
        match class {
            InstClass::Integer => self.inst_int += 1,
            InstClass::Float => self.inst_float += 1,
            InstClass::Branch => self.inst_branch += 1,
            InstClass::Load => self.inst_load += 1,
            InstClass::Store => self.inst_store += 1,
            InstClass::Other => self.inst_other += 1,
        }
    }

    /// Retired instructions of `class`.
    pub const fn retired(&self, class: InstClass) -> u64 {
        match class {
            InstClass::Integer => self.inst_int,
            InstClass::Float => self.inst_float,
            InstClass::Branch => self.inst_branch,
            InstClass::Load => self.inst_load,
            InstClass::Store => self.inst_store,
            InstClass::Other => self.inst_other,
        }
    }

    /// Retired instructions across all classes.
    pub const fn instructions_retired(&self) -> u64 {
        self.inst_int
            + self.inst_float
            + self.inst_branch
            + self.inst_load
            + self.inst_store
            + self.inst_other
    }

    /// Retired instructions per cycle, or 0 for an empty run.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            return 0.0;
        }
        self.instructions_retired() as f64 / self.cycles as f64
    }

    /// Serializes the counters, plus derived totals, as a JSON object.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures from `serde_json`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let serde_json::Value::Object(map) = &mut value {
            let _ = map.insert(
                "instructions_retired".to_owned(),
                self.instructions_retired().into(),
            );
            let _ = map.insert("ipc".to_owned(), self.ipc().into());
        }
        serde_json::to_string_pretty(&value)
    }

    /// The detail sections named in `sections`, ready to display.
    ///
    /// An empty slice selects every section. Unknown names are ignored.
    pub fn sections<'a>(&'a self, sections: &'a [String]) -> SectionReport<'a> {
        SectionReport {
            stats: self,
            sections,
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to print all sections.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.sections(sections));
    }

    /// Prints the plain-text report to stdout.
    pub fn print(&self) {
        print!("{self}");
    }
}

/// The plain-text end-of-run report.
impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total cycles: {}", self.cycles)?;
        writeln!(f, "Total integer instructions: {}", self.inst_int)?;
        writeln!(f, "Total floating point instructions: {}", self.inst_float)?;
        writeln!(f, "Total branch instructions: {}", self.inst_branch)?;
        writeln!(f, "Total memory load instructions: {}", self.inst_load)?;
        writeln!(f, "Total memory store instructions: {}", self.inst_store)?;
        writeln!(f, "Total other instructions: {}", self.inst_other)?;
        writeln!(f, "Total instructions: {}", self.instructions_retired())
    }
}

/// A selection of detail sections borrowed from [`SimStats`].
#[derive(Debug, Clone, Copy)]
pub struct SectionReport<'a> {
    stats: &'a SimStats,
    sections: &'a [String],
}

impl SectionReport<'_> {
    fn wants(&self, section: &str) -> bool {
        self.sections.is_empty() || self.sections.iter().any(|s| s == section)
    }
}

impl fmt::Display for SectionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RULE: &str = "----------------------------------------------------------";
        let stats = self.stats;
        let cyc = stats.cycles.max(1) as f64;
        let retired = stats.instructions_retired();

        writeln!(f, "==========================================================")?;
        writeln!(f, "PIPELINE SIMULATION STATISTICS")?;
        writeln!(f, "==========================================================")?;
        if self.wants("summary") {
            writeln!(f, "sim_cycles               {}", stats.cycles)?;
            writeln!(f, "sim_insts                {retired}")?;
            writeln!(f, "sim_fetched              {}", stats.instructions_fetched)?;
            writeln!(f, "sim_ipc                  {:.4}", stats.ipc())?;
            writeln!(f, "{RULE}")?;
        }
        if self.wants("instruction_mix") {
            let total = retired.max(1) as f64;
            writeln!(f, "INSTRUCTION MIX")?;
            for class in InstClass::ALL {
                let count = stats.retired(class);
                let label = format!("op.{}", class.mnemonic().to_lowercase());
                writeln!(
                    f,
                    "  {label:<22} {count} ({:.2}%)",
                    count as f64 / total * 100.0
                )?;
            }
            writeln!(f, "{RULE}")?;
        }
        if self.wants("stalls") {
            writeln!(f, "STALLS")?;
            writeln!(
                f,
                "  stalls.data            {} ({:.2}%)",
                stats.stalls_data,
                stats.stalls_data as f64 / cyc * 100.0
            )?;
            writeln!(
                f,
                "  stalls.control         {} ({:.2}%)",
                stats.stalls_control,
                stats.stalls_control as f64 / cyc * 100.0
            )?;
            writeln!(f, "  queue.ex_deferrals     {}", stats.ex_deferrals)?;
            writeln!(f, "  queue.mem_deferrals    {}", stats.mem_deferrals)?;
            writeln!(f, "  squash.intra_bundle    {}", stats.intra_bundle_squashes)?;
        }
        writeln!(f, "==========================================================")
    }
}
