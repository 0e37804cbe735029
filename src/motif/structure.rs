use super::alignment::Alignment;
use super::element::StructuralElement;
use super::pairing::ConsensusPairing;

/// Inclusive column range of one top-level helix, outermost pair at its ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StemLoopSpan {
    pub start: usize,
    pub end: usize,
}

/// Splits a pairing into its top-level stem-loops, left to right.
pub fn find_stem_loops(pairing: &ConsensusPairing) -> Vec<StemLoopSpan> {
    let mut spans = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut pending: Option<StemLoopSpan> = None;

    for pos in 0..pairing.len() {
        let Some(partner) = pairing.partner(pos) else {
            continue;
        };
        if partner > pos {
            if open.is_empty() {
                if let Some(span) = pending.take() {
                    spans.push(span);
                }
            }
            open.push(pos);
        } else if open.last() == Some(&partner) {
            open.pop();
            pending = Some(StemLoopSpan {
                start: partner,
                end: pos,
            });
        }
    }

    if let Some(span) = pending {
        spans.push(span);
    }
    spans
}

/// Decomposes a stem-loop into structural elements, innermost first.
pub fn partition(
    span: StemLoopSpan,
    alignment: &Alignment,
    pairing: &ConsensusPairing,
) -> Vec<StructuralElement> {
    let mut elements = Vec::new();
    let (mut i, mut j) = (span.start, span.end);

    loop {
        let (outer_i, outer_j) = (i, j);
        while i + 1 < j - 1 && pairing.partner(i + 1) == Some(j - 1) {
            i += 1;
            j -= 1;
        }
        log::debug!("Stem [{},{}] ; [{},{}]", outer_i, i, j, outer_j);
        elements.push(StructuralElement::stem(alignment, (outer_i, i), (j, outer_j)));

        let Some(left_end) = (i + 1..j).find(|&p| pairing.is_paired(p)) else {
            if i + 1 < j {
                log::debug!("Hairpin [{},{}]", i + 1, j - 1);
                elements.push(StructuralElement::hairpin(alignment, i + 1, j - 1));
            }
            break;
        };
        let right_start = (i + 1..j)
            .rev()
            .find(|&p| pairing.is_paired(p))
            .unwrap_or(left_end);

        if pairing.partner(left_end) != Some(right_start) {
            log::debug!("Multiloop [{},{}]", i + 1, j - 1);
            elements.push(StructuralElement::multiloop(alignment, i + 1, j - 1));
            break;
        }

        match (left_end > i + 1, right_start + 1 < j) {
            (true, true) => {
                log::debug!(
                    "Interior loop [{},{}] ; [{},{}]",
                    i + 1,
                    left_end - 1,
                    right_start + 1,
                    j - 1
                );
                elements.push(StructuralElement::interior_loop(
                    alignment,
                    (i + 1, left_end - 1),
                    (right_start + 1, j - 1),
                ));
            }
            (true, false) => {
                log::debug!("Left bulge [{},{}]", i + 1, left_end - 1);
                elements.push(StructuralElement::left_bulge(alignment, i + 1, left_end - 1));
            }
            (false, true) => {
                log::debug!("Right bulge [{},{}]", right_start + 1, j - 1);
                elements.push(StructuralElement::right_bulge(alignment, right_start + 1, j - 1));
            }
            (false, false) => {}
        }

        i = left_end;
        j = right_start;
    }

    elements.reverse();
    elements
}
