use super::{Diagram, Edge, Lane, Shape, Step};

const MAKER_FILL: &str = "fillColor=#dae8fc;strokeColor=#6c8ebf;";
const CHECKER_FILL: &str = "fillColor=#d5e8d4;strokeColor=#82b366;";
const SYSTEM_FILL: &str = "fillColor=#f5f5f5;strokeColor=#666666;";

fn step(id: &str, label: &str, shape: Shape, style: &str) -> Step {
    Step {
        id: id.to_string(),
        label: label.to_string(),
        shape,
        style: Some(style.to_string()),
    }
}

fn edge(source: &str, target: &str, label: Option<&str>) -> Edge {
    Edge {
        source: source.to_string(),
        target: target.to_string(),
        label: label.map(str::to_string),
    }
}

fn lane(name: &str, steps: &[&str]) -> Lane {
    Lane {
        name: name.to_string(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
    }
}

/// The manual maker-checker approval of a payment instruction.
pub fn maker_checker() -> Diagram {
    use Shape::*;

    let steps = vec![
        step("start", "Start", Terminator, MAKER_FILL),
        step("prepare", "Maker prepares payment instruction", Process, MAKER_FILL),
        step("attach", "Maker attaches supporting documents", Document, MAKER_FILL),
        step("submit", "Maker submits for approval", Process, MAKER_FILL),
        step("rework", "Maker corrects and resubmits", Process, MAKER_FILL),
        step("review", "Checker reviews instruction against account details", Process, CHECKER_FILL),
        step("decision", "Details correct?", Decision, CHECKER_FILL),
        step("approve", "Checker approves", Process, CHECKER_FILL),
        step("release", "Instruction released to bank", Process, SYSTEM_FILL),
        step("notify", "Maker and checker notified", Process, SYSTEM_FILL),
        step("archive", "Audit trail recorded", Document, SYSTEM_FILL),
        step("end", "End", Terminator, SYSTEM_FILL),
    ];

    let edges = vec![
        edge("start", "prepare", None),
        edge("prepare", "attach", None),
        edge("attach", "submit", None),
        edge("submit", "review", None),
        edge("review", "decision", None),
        edge("decision", "approve", Some("Yes")),
        edge("decision", "rework", Some("No")),
        edge("rework", "review", Some("Resubmitted")),
        edge("approve", "release", None),
        edge("release", "notify", None),
        edge("notify", "archive", None),
        edge("archive", "end", None),
    ];

    let lanes = vec![
        lane("Maker", &["start", "prepare", "attach", "submit", "rework"]),
        lane("Checker", &["review", "decision", "approve"]),
        lane("System", &["release", "notify", "archive", "end"]),
    ];

    Diagram {
        name: "Maker-Checker Process".to_string(),
        steps,
        edges,
        lanes,
    }
}
