//! Value-change-dump (VCD) tracing.
//!
//! [`VcdWriter`] is a small IEEE 1364 VCD emitter: declare variables, write
//! the header, then report values at non-decreasing times. Only values that
//! actually changed are written.
//!
//! The encoder itself knows nothing about tracing. [`VectorChannels`] snapshots
//! a published hypervector into one integer channel per element, and
//! [`TraceRecorder`] wires up the full channel set the harness records:
//! `init`, `training`, `test`, `hv1_<i>` (item memory) and `hv2_<i>`
//! (output).

use crate::encoder::Publication;
use crate::error::Result;
use crate::vector::Hypervector;
use std::io::{self, Write};

const VERSION: &str = concat!("itemmem ", env!("CARGO_PKG_VERSION"));

/// Handle to a declared VCD variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VarId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VarKind {
    Wire,
    Integer,
}

#[derive(Debug)]
struct Var {
    name: String,
    code: String,
    kind: VarKind,
    value: i64,
}

/// Streaming VCD writer.
#[derive(Debug)]
pub struct VcdWriter<W: Write> {
    out: W,
    scope: String,
    vars: Vec<Var>,
    header_written: bool,
    /// Time of the last `#<time>` marker written
    time: Option<u64>,
}

impl<W: Write> VcdWriter<W> {
    /// Create a writer with all variables under `scope`.
    pub fn new(out: W, scope: impl Into<String>) -> Self {
        Self {
            out,
            scope: scope.into(),
            vars: Vec::new(),
            header_written: false,
            time: None,
        }
    }

    /// Declare a 1-bit wire, initially 0.
    pub fn add_wire(&mut self, name: impl Into<String>) -> VarId {
        self.add_var(name.into(), VarKind::Wire)
    }

    /// Declare a 32-bit integer, initially 0.
    pub fn add_integer(&mut self, name: impl Into<String>) -> VarId {
        self.add_var(name.into(), VarKind::Integer)
    }

    fn add_var(&mut self, name: String, kind: VarKind) -> VarId {
        assert!(!self.header_written, "variables must be declared before the header");
        let id = self.vars.len();
        self.vars.push(Var {
            name,
            code: id_code(id),
            kind,
            value: 0,
        });
        VarId(id)
    }

    /// Number of declared variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Write the declarations and the initial `$dumpvars` block at time 0.
    pub fn write_header(&mut self) -> Result<()> {
        if self.header_written {
            return Ok(());
        }
        let out = &mut self.out;
        writeln!(out, "$date\n    simulation\n$end")?;
        writeln!(out, "$version\n    {}\n$end", VERSION)?;
        writeln!(out, "$timescale 1 ns $end")?;
        writeln!(out, "$scope module {} $end", self.scope)?;
        for var in &self.vars {
            let (ty, width) = match var.kind {
                VarKind::Wire => ("wire", 1),
                VarKind::Integer => ("integer", 32),
            };
            writeln!(out, "$var {} {} {} {} $end", ty, width, var.code, var.name)?;
        }
        writeln!(out, "$upscope $end")?;
        writeln!(out, "$enddefinitions $end")?;

        writeln!(out, "#0")?;
        writeln!(out, "$dumpvars")?;
        for var in &self.vars {
            write_value(out, var)?;
        }
        writeln!(out, "$end")?;

        self.header_written = true;
        self.time = Some(0);
        Ok(())
    }

    /// Report `value` for `var` at `time` (ns). No-op if unchanged.
    pub fn change(&mut self, time: u64, var: VarId, value: i64) -> Result<()> {
        self.write_header()?;

        let current = self.time.unwrap_or(0);
        if time < current {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("VCD time went backwards: {} < {}", time, current),
            )
            .into());
        }

        let entry = &mut self.vars[var.0];
        if entry.value == value {
            return Ok(());
        }
        entry.value = value;

        if time > current {
            writeln!(self.out, "#{}", time)?;
            self.time = Some(time);
        }
        write_value(&mut self.out, &self.vars[var.0])?;
        Ok(())
    }

    /// Last value reported for `var`.
    pub fn value(&self, var: VarId) -> i64 {
        self.vars[var.0].value
    }

    /// Write a final time marker, flush, and return the sink.
    pub fn finish(mut self, end_time: u64) -> Result<W> {
        self.write_header()?;
        if end_time > self.time.unwrap_or(0) {
            writeln!(self.out, "#{}", end_time)?;
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

fn write_value<W: Write>(out: &mut W, var: &Var) -> io::Result<()> {
    match var.kind {
        VarKind::Wire => writeln!(out, "{}{}", if var.value != 0 { 1 } else { 0 }, var.code),
        VarKind::Integer => writeln!(out, "b{:b} {}", var.value as i32, var.code),
    }
}

/// Printable-ASCII identifier code for variable number `index`.
fn id_code(mut index: usize) -> String {
    const FIRST: u8 = b'!';
    const RADIX: usize = (b'~' - b'!' + 1) as usize;

    let mut code = String::new();
    loop {
        code.push((FIRST + (index % RADIX) as u8) as char);
        index /= RADIX;
        if index == 0 {
            break;
        }
        index -= 1;
    }
    code
}

/// One integer channel per element of a hypervector.
#[derive(Debug, Clone)]
pub struct VectorChannels {
    channels: Vec<VarId>,
}

impl VectorChannels {
    /// Declare `<prefix>_<i>` for every element index.
    pub fn attach<W: Write>(writer: &mut VcdWriter<W>, prefix: &str, dimensions: usize) -> Self {
        let channels = (0..dimensions)
            .map(|i| writer.add_integer(format!("{}_{}", prefix, i)))
            .collect();
        Self { channels }
    }

    pub fn dimensions(&self) -> usize {
        self.channels.len()
    }

    /// Record every element of `vector` at `time`.
    pub fn sample<W: Write>(
        &self,
        writer: &mut VcdWriter<W>,
        time: u64,
        vector: &Hypervector,
    ) -> Result<()> {
        assert_eq!(
            self.channels.len(),
            vector.dimensions(),
            "Dimension mismatch in vector channels"
        );
        for (&var, &value) in self.channels.iter().zip(vector.iter()) {
            writer.change(time, var, value as i64)?;
        }
        Ok(())
    }
}

/// The harness's full trace: control wires plus item-memory and output channels.
#[derive(Debug)]
pub struct TraceRecorder<W: Write> {
    writer: VcdWriter<W>,
    init: VarId,
    training: VarId,
    test: VarId,
    item_memory: VectorChannels,
    output: VectorChannels,
    last_time: u64,
}

impl<W: Write> TraceRecorder<W> {
    /// Declare all channels for a `dimensions`-long encoder and write the header.
    pub fn new(out: W, dimensions: usize) -> Result<Self> {
        let mut writer = VcdWriter::new(out, "binding");
        let init = writer.add_wire("init");
        let training = writer.add_wire("training");
        let test = writer.add_wire("test");
        let item_memory = VectorChannels::attach(&mut writer, "hv1", dimensions);
        let output = VectorChannels::attach(&mut writer, "hv2", dimensions);
        writer.write_header()?;

        Ok(Self {
            writer,
            init,
            training,
            test,
            item_memory,
            output,
            last_time: 0,
        })
    }

    /// Record the control line levels at `time`.
    pub fn record_signals(&mut self, time: u64, levels: (bool, bool, bool)) -> Result<()> {
        let (init, training, test) = levels;
        self.writer.change(time, self.init, init as i64)?;
        self.writer.change(time, self.training, training as i64)?;
        self.writer.change(time, self.test, test as i64)?;
        self.last_time = self.last_time.max(time);
        Ok(())
    }

    /// Record a publication's item-memory and output vectors at `time`.
    pub fn record_publication(&mut self, time: u64, publication: &Publication) -> Result<()> {
        self.item_memory
            .sample(&mut self.writer, time, publication.item_memory())?;
        self.output.sample(&mut self.writer, time, publication.output())?;
        self.last_time = self.last_time.max(time);
        Ok(())
    }

    /// Close the trace at `end_time` and return the sink.
    pub fn finish(self, end_time: u64) -> Result<W> {
        self.writer.finish(end_time.max(self.last_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_id_codes_unique() {
        let codes: std::collections::HashSet<String> = (0..20_000).map(id_code).collect();
        assert_eq!(codes.len(), 20_000);
        assert_eq!(id_code(0), "!");
        assert_eq!(id_code(93), "~");
        assert_eq!(id_code(94).len(), 2);
        assert!(codes.iter().all(|c| c.bytes().all(|b| (b'!'..=b'~').contains(&b))));
    }

    #[test]
    fn test_header_declares_vars() {
        let mut w = VcdWriter::new(Vec::new(), "binding");
        w.add_wire("init");
        w.add_integer("hv1_0");
        let out = text(w.finish(0).unwrap());

        assert!(out.contains("$timescale 1 ns $end"));
        assert!(out.contains("$scope module binding $end"));
        assert!(out.contains("$var wire 1 ! init $end"));
        assert!(out.contains("$var integer 32 \" hv1_0 $end"));
        assert!(out.contains("$dumpvars\n0!\nb0 \"\n$end"));
    }

    #[test]
    fn test_only_changes_are_dumped() {
        let mut w = VcdWriter::new(Vec::new(), "top");
        let a = w.add_integer("a");
        w.change(5, a, 0).unwrap();
        w.change(10, a, 3).unwrap();
        w.change(20, a, 3).unwrap();
        assert_eq!(w.value(a), 3);
        let out = text(w.finish(30).unwrap());

        assert!(!out.contains("#5\n"));
        assert!(out.contains("#10\nb11 !\n"));
        assert!(!out.contains("#20"));
        assert!(out.ends_with("#30\n"));
    }

    #[test]
    fn test_negative_integer_twos_complement() {
        let mut w = VcdWriter::new(Vec::new(), "top");
        let a = w.add_integer("a");
        w.change(1, a, -1).unwrap();
        assert_eq!(w.value(a), -1);
        let out = text(w.finish(1).unwrap());
        assert!(out.contains(&format!("b{} !", "1".repeat(32))));
    }

    #[test]
    fn test_time_must_not_go_backwards() {
        let mut w = VcdWriter::new(Vec::new(), "top");
        let a = w.add_wire("a");
        w.change(10, a, 1).unwrap();
        assert!(w.change(5, a, 0).is_err());
    }

    #[test]
    fn test_vector_channels() {
        let mut w = VcdWriter::new(Vec::new(), "top");
        let channels = VectorChannels::attach(&mut w, "hv1", 3);
        assert_eq!(channels.dimensions(), 3);
        assert_eq!(w.var_count(), 3);
        channels
            .sample(&mut w, 10, &Hypervector::from_data(vec![1, 0, 1]))
            .unwrap();
        let out = text(w.finish(10).unwrap());

        assert!(out.contains("hv1_2 $end"));
        assert!(out.contains("#10\nb1 !\nb1 #\n"));
    }
}
