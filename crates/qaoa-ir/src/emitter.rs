//! OpenQASM 3 emitter for serializing programs.

use crate::instruction::{Instruction, InstructionKind};
use crate::line::LineId;
use crate::program::Program;

/// Emit a program as OpenQASM 3 source code.
///
/// Line `i` maps to `q[i]`; a full measurement writes `c[i] = measure q[i];`
/// for every line.
pub fn emit_qasm(program: &Program) -> String {
    let mut emitter = Emitter::new();
    emitter.emit_program(program);
    emitter.output
}

struct Emitter {
    output: String,
}

impl Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn emit_program(&mut self, program: &Program) {
        self.writeln("OPENQASM 3.0;");
        self.writeln("include \"stdgates.inc\";");
        self.writeln("");

        let num_lines = program.num_lines();
        if num_lines > 0 {
            self.writeln(&format!("qubit[{num_lines}] q;"));
            if program.is_terminated() {
                self.writeln(&format!("bit[{num_lines}] c;"));
            }
            self.writeln("");
        }

        for instruction in program.instructions() {
            self.emit_instruction(instruction);
        }
    }

    fn emit_instruction(&mut self, instruction: &Instruction) {
        let lines = emit_lines(&instruction.lines);
        match &instruction.kind {
            InstructionKind::H | InstructionKind::Cx => {
                self.writeln(&format!("{} {lines};", instruction.name()));
            }
            InstructionKind::Rz(theta) | InstructionKind::Rx(theta) => {
                self.writeln(&format!(
                    "{}({}) {lines};",
                    instruction.name(),
                    emit_angle(*theta)
                ));
            }
            InstructionKind::Barrier => {
                if lines.is_empty() {
                    self.writeln("barrier;");
                } else {
                    self.writeln(&format!("barrier {lines};"));
                }
            }
            InstructionKind::Measure => {
                for line in &instruction.lines {
                    self.writeln(&format!("c[{0}] = measure q[{0}];", line.0));
                }
            }
        }
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

fn emit_lines(lines: &[LineId]) -> String {
    lines
        .iter()
        .map(|l| format!("q[{}]", l.0))
        .collect::<Vec<_>>()
        .join(", ")
}

fn emit_angle(v: f64) -> String {
    let pi = std::f64::consts::PI;
    // Check if close to common multiples of pi
    for (value, text) in [
        (pi, "pi"),
        (-pi, "-pi"),
        (2.0 * pi, "2*pi"),
        (pi / 2.0, "pi/2"),
        (-pi / 2.0, "-pi/2"),
        (pi / 4.0, "pi/4"),
        (-pi / 4.0, "-pi/4"),
        (2.0 * pi / 3.0, "2*pi/3"),
    ] {
        if (v - value).abs() < 1e-10 {
            return text.into();
        }
    }
    format!("{v:.6}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_small_program() {
        let mut program = Program::new("zz", 2);
        program.h(LineId(0)).unwrap();
        program.h(LineId(1)).unwrap();
        program.cx(LineId(0), LineId(1)).unwrap();
        program.rz(std::f64::consts::PI, LineId(1)).unwrap();
        program.cx(LineId(0), LineId(1)).unwrap();
        program.barrier_all().unwrap();
        program.rx(0.25, LineId(0)).unwrap();
        program.measure_all().unwrap();

        let qasm = emit_qasm(&program);
        assert!(qasm.starts_with("OPENQASM 3.0;"));
        assert!(qasm.contains("qubit[2] q;"));
        assert!(qasm.contains("bit[2] c;"));
        assert!(qasm.contains("cx q[0], q[1];"));
        assert!(qasm.contains("rz(pi) q[1];"));
        assert!(qasm.contains("barrier q[0], q[1];"));
        assert!(qasm.contains("rx(0.250000) q[0];"));
        assert!(qasm.contains("c[1] = measure q[1];"));
    }

    #[test]
    fn test_unmeasured_program_has_no_bits() {
        let mut program = Program::new("open", 1);
        program.h(LineId(0)).unwrap();
        let qasm = emit_qasm(&program);
        assert!(!qasm.contains("bit["));
        assert!(qasm.contains("h q[0];"));
    }
}
