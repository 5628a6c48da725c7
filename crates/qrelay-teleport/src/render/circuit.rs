//! Circuit diagrams.
//!
//! Columns follow the DAG's ASAP layers. Inside a layer, operations whose
//! vertical extent overlaps (a CX spanning a wire, a measurement line
//! crossing to its classical bit) are spread over extra sub-columns so that
//! no two symbols collide.

use qrelay_ir::{
    Circuit, ClbitId, ConditionTarget, Instruction, InstructionKind, QubitId, StandardGate,
};
use rustc_hash::FxHashMap;

use super::svg::{Anchor, Stroke, SvgDocument};

const LEFT_MARGIN: f64 = 90.0;
const TOP_MARGIN: f64 = 50.0;
const ROW_HEIGHT: f64 = 50.0;
const COLUMN_WIDTH: f64 = 64.0;
const BOX: f64 = 34.0;

const GATE_FILL: &str = "#dbe9ff";
const CONDITIONAL_FILL: &str = "#ffe6c7";
const NOISE_FILL: &str = "#ffd6d6";
const WIRE: &str = "#333333";

struct Rows {
    qubits: FxHashMap<QubitId, usize>,
    clbits: FxHashMap<ClbitId, usize>,
}

impl Rows {
    fn new(circuit: &Circuit) -> Self {
        let nq = circuit.num_qubits();
        Self {
            qubits: circuit.qubits().iter().enumerate().map(|(i, q)| (q.id, i)).collect(),
            clbits: circuit
                .clbits()
                .iter()
                .enumerate()
                .map(|(i, c)| (c.id, nq + i))
                .collect(),
        }
    }

    fn qubit(&self, q: QubitId) -> usize {
        self.qubits.get(&q).copied().unwrap_or(0)
    }

    fn clbit(&self, c: ClbitId) -> usize {
        self.clbits.get(&c).copied().unwrap_or(0)
    }

    /// Rows an instruction's drawing occupies, inclusive.
    fn span(&self, inst: &Instruction) -> (usize, usize) {
        let rows = inst
            .qubits
            .iter()
            .map(|q| self.qubit(*q))
            .chain(inst.clbits.iter().map(|c| self.clbit(*c)));
        let (mut lo, mut hi) = (usize::MAX, 0);
        for r in rows {
            lo = lo.min(r);
            hi = hi.max(r);
        }
        if lo == usize::MAX { (0, 0) } else { (lo, hi) }
    }
}

fn row_y(row: usize) -> f64 {
    TOP_MARGIN + ROW_HEIGHT * (row as f64 + 0.5)
}

fn column_x(column: usize) -> f64 {
    LEFT_MARGIN + COLUMN_WIDTH * (column as f64 + 0.5)
}

/// Split every layer into sub-columns of non-overlapping spans.
fn assign_columns<'a>(circuit: &'a Circuit, rows: &Rows) -> Vec<Vec<&'a Instruction>> {
    let mut columns = vec![];
    for layer in circuit.dag().layers() {
        let mut subcolumns: Vec<(Vec<(usize, usize)>, Vec<&Instruction>)> = vec![];
        for inst in layer {
            let (lo, hi) = rows.span(inst);
            let slot = subcolumns
                .iter()
                .position(|(spans, _)| spans.iter().all(|&(a, b)| hi < a || lo > b));
            match slot {
                Some(i) => {
                    subcolumns[i].0.push((lo, hi));
                    subcolumns[i].1.push(inst);
                }
                None => subcolumns.push((vec![(lo, hi)], vec![inst])),
            }
        }
        columns.extend(subcolumns.into_iter().map(|(_, ops)| ops));
    }
    columns
}

fn gate_label(kind: &StandardGate) -> String {
    let name = match kind {
        StandardGate::I => "I".to_string(),
        StandardGate::Sdg => "S†".to_string(),
        StandardGate::Tdg => "T†".to_string(),
        StandardGate::SX => "√X".to_string(),
        other => {
            let n = other.name();
            let mut chars = n.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    };
    match kind.angle() {
        Some(theta) => format!("{name}({theta:.2})"),
        None => name,
    }
}

fn labelled_box(doc: &mut SvgDocument, x: f64, y: f64, label: &str, fill: &str) {
    let width = BOX.max(8.0 * label.chars().count() as f64 + 8.0).min(COLUMN_WIDTH - 4.0);
    doc.rect(
        x - width / 2.0,
        y - BOX / 2.0,
        width,
        BOX,
        fill,
        Some(Stroke::solid(WIRE, 1.0)),
    );
    let size = if label.chars().count() > 6 { 9.0 } else { 13.0 };
    doc.text(x, y, label, size, Anchor::Middle);
}

fn draw_condition(
    doc: &mut SvgDocument,
    circuit: &Circuit,
    rows: &Rows,
    x: f64,
    inst: &Instruction,
) {
    let Some(condition) = inst.as_gate().and_then(|g| g.condition.as_ref()) else {
        return;
    };
    let top = inst.qubits.iter().map(|q| rows.qubit(*q)).max().unwrap_or(0);
    let bottom = inst.clbits.iter().map(|c| rows.clbit(*c)).max().unwrap_or(top);
    doc.line(
        x - 1.5,
        row_y(top) + BOX / 2.0,
        x - 1.5,
        row_y(bottom),
        Stroke::solid(WIRE, 1.0),
    );
    doc.line(
        x + 1.5,
        row_y(top) + BOX / 2.0,
        x + 1.5,
        row_y(bottom),
        Stroke::solid(WIRE, 1.0),
    );
    for c in &inst.clbits {
        doc.circle(x, row_y(rows.clbit(*c)), 5.0, WIRE, None);
    }

    let label = match &condition.target {
        ConditionTarget::Bit(c) => {
            let name = circuit
                .clbits()
                .iter()
                .find(|b| b.id == *c)
                .map_or_else(|| c.to_string(), |b| b.to_string());
            format!("{name}={}", condition.value)
        }
        ConditionTarget::Register(name) => format!("{name}={}", condition.value),
    };
    doc.text(x + 8.0, row_y(bottom) - 12.0, &label, 9.0, Anchor::Start);
}

fn draw_instruction(
    doc: &mut SvgDocument,
    circuit: &Circuit,
    rows: &Rows,
    x: f64,
    inst: &Instruction,
) {
    let ys: Vec<f64> = inst.qubits.iter().map(|q| row_y(rows.qubit(*q))).collect();
    let Some(&y0) = ys.first() else {
        return;
    };

    match &inst.kind {
        InstructionKind::Gate(gate) => match &gate.kind {
            StandardGate::CX | StandardGate::CZ | StandardGate::Swap if ys.len() == 2 => {
                let y1 = ys[1];
                doc.line(x, y0, x, y1, Stroke::solid(WIRE, 1.5));
                match &gate.kind {
                    StandardGate::CX => {
                        doc.circle(x, y0, 5.0, WIRE, None);
                        doc.circle(x, y1, 11.0, "white", Some(Stroke::solid(WIRE, 1.5)));
                        doc.line(x - 11.0, y1, x + 11.0, y1, Stroke::solid(WIRE, 1.5));
                        doc.line(x, y1 - 11.0, x, y1 + 11.0, Stroke::solid(WIRE, 1.5));
                    }
                    StandardGate::CZ => {
                        doc.circle(x, y0, 5.0, WIRE, None);
                        doc.circle(x, y1, 5.0, WIRE, None);
                    }
                    _ => {
                        for y in [y0, y1] {
                            doc.line(x - 7.0, y - 7.0, x + 7.0, y + 7.0, Stroke::solid(WIRE, 1.5));
                            doc.line(x - 7.0, y + 7.0, x + 7.0, y - 7.0, Stroke::solid(WIRE, 1.5));
                        }
                    }
                }
            }
            _ => {
                draw_condition(doc, circuit, rows, x, inst);
                let fill = if gate.is_conditional() {
                    CONDITIONAL_FILL
                } else {
                    GATE_FILL
                };
                let label = gate_label(&gate.kind);
                labelled_box(doc, x, y0, &label, fill);
            }
        },
        InstructionKind::Measure => {
            if let Some(c) = inst.clbits.first() {
                let yc = row_y(rows.clbit(*c));
                doc.line(x - 1.5, y0, x - 1.5, yc - 6.0, Stroke::solid(WIRE, 1.0));
                doc.line(x + 1.5, y0, x + 1.5, yc - 6.0, Stroke::solid(WIRE, 1.0));
                doc.polyline(
                    &[(x - 5.0, yc - 8.0), (x, yc), (x + 5.0, yc - 8.0)],
                    Stroke::solid(WIRE, 1.5),
                );
            }
            labelled_box(doc, x, y0, "M", "#e0e0e0");
        }
        InstructionKind::Reset => labelled_box(doc, x, y0, "|0⟩", GATE_FILL),
        InstructionKind::Barrier => {
            let top = ys.iter().copied().fold(f64::INFINITY, f64::min);
            let bottom = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            doc.rect(
                x - 6.0,
                top - ROW_HEIGHT / 2.0 + 4.0,
                12.0,
                bottom - top + ROW_HEIGHT - 8.0,
                "#eeeeee",
                None,
            );
            doc.line(
                x,
                top - ROW_HEIGHT / 2.0 + 4.0,
                x,
                bottom + ROW_HEIGHT / 2.0 - 4.0,
                Stroke::dashed("#888888", 1.0),
            );
        }
        InstructionKind::Delay { duration } => {
            labelled_box(doc, x, y0, &format!("delay({duration:.0})"), "#f2f2f2");
        }
        InstructionKind::NoiseChannel { channel } => {
            labelled_box(doc, x, y0, channel.name(), NOISE_FILL);
        }
    }
}

/// Draw `circuit` with a title.
pub fn circuit_diagram(circuit: &Circuit, title: &str) -> SvgDocument {
    let rows = Rows::new(circuit);
    let columns = assign_columns(circuit, &rows);
    let num_rows = circuit.num_qubits() + circuit.num_clbits();

    let width = LEFT_MARGIN + COLUMN_WIDTH * (columns.len().max(1) as f64) + 30.0;
    let height = TOP_MARGIN + ROW_HEIGHT * num_rows.max(1) as f64 + 20.0;
    let mut doc = SvgDocument::new(width, height);
    doc.title(title);

    let wire_end = width - 15.0;
    for (i, qubit) in circuit.qubits().iter().enumerate() {
        let y = row_y(i);
        doc.text(LEFT_MARGIN - 10.0, y, &qubit.to_string(), 12.0, Anchor::End);
        doc.line(LEFT_MARGIN, y, wire_end, y, Stroke::solid(WIRE, 1.0));
    }
    for (i, clbit) in circuit.clbits().iter().enumerate() {
        let y = row_y(circuit.num_qubits() + i);
        doc.text(LEFT_MARGIN - 10.0, y, &clbit.to_string(), 12.0, Anchor::End);
        doc.line(LEFT_MARGIN, y - 1.5, wire_end, y - 1.5, Stroke::solid("#777777", 1.0));
        doc.line(LEFT_MARGIN, y + 1.5, wire_end, y + 1.5, Stroke::solid("#777777", 1.0));
    }

    for (col, ops) in columns.iter().enumerate() {
        let x = column_x(col);
        for inst in ops {
            draw_instruction(&mut doc, circuit, &rows, x, inst);
        }
    }
    doc
}
