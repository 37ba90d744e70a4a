//! Dependency scheduling.

use std::collections::VecDeque;

use ahash::HashSet;
use tcsol_types::{Gate, InputCount, TruthTable, ValidationError};
use tracing::{debug, trace};

/// Orders `gates` so that every gate comes after the producers of its
/// sources.
///
/// Gates are taken round-robin from a FIFO queue. A gate whose sources are
/// all available is accepted, otherwise it goes to the back of the queue. A
/// full pass over the queue without a single acceptance means the remaining
/// gates wait on each other, which is reported as
/// [`ValidationError::CycleDetected`] with every stalled output.
///
/// A source that neither `inputs` nor any gate can produce fails with
/// [`ValidationError::UnreachableSource`] as soon as its gate is dequeued.
///
/// The result is stable: among gates that are ready at the same point, the
/// one declared first is scheduled first. `n` is only used for rendering
/// diagnostics.
pub fn schedule(
    n: InputCount,
    gates: &[Gate],
    inputs: &[TruthTable],
) -> Result<Vec<Gate>, ValidationError> {
    let producible = inputs
        .iter()
        .copied()
        .chain(gates.iter().map(Gate::output))
        .collect::<HashSet<_>>();
    let mut done = inputs.iter().copied().collect::<HashSet<_>>();

    let mut queue = gates.iter().collect::<VecDeque<_>>();
    let mut order = Vec::with_capacity(gates.len());
    let mut passes = 0usize;

    while !queue.is_empty() {
        let mut progressed = false;

        // Visit each queued gate exactly once per pass.
        for _ in 0..queue.len() {
            let Some(gate) = queue.pop_front() else {
                break;
            };

            if let Some(missing) = gate.sources().iter().find(|s| !producible.contains(*s)) {
                return Err(ValidationError::UnreachableSource {
                    missing: n.bits(*missing),
                });
            }

            if gate.sources().iter().all(|s| done.contains(s)) {
                done.insert(gate.output());
                order.push(gate.clone());
                progressed = true;
            } else {
                trace!(output = gate.output().value(), "requeue gate");
                queue.push_back(gate);
            }
        }

        passes += 1;
        if !progressed {
            let stalled = queue.iter().map(|g| n.bits(g.output())).collect();
            return Err(ValidationError::CycleDetected { stalled });
        }
    }

    debug!(gates = order.len(), passes, "scheduled gates");
    Ok(order)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::seq::SliceRandom;
    use rand_chacha::ChaCha8Rng;
    use test_log::test;

    use super::*;

    fn tt(v: u64) -> TruthTable {
        TruthTable::new(v)
    }

    fn n2() -> InputCount {
        InputCount::new(2).unwrap()
    }

    const A: u64 = 0b1010;
    const B: u64 = 0b1100;

    fn xor_gates() -> Vec<Gate> {
        vec![
            Gate::nand(tt(0b0111), tt(A), tt(B)),
            Gate::nand(tt(0b1011), tt(A), tt(0b0111)),
            Gate::nand(tt(0b1101), tt(B), tt(0b0111)),
            Gate::nand(tt(0b0110), tt(0b1011), tt(0b1101)),
        ]
    }

    fn position(order: &[Gate], output: u64) -> usize {
        order.iter().position(|g| g.output() == tt(output)).unwrap()
    }

    #[test]
    fn test_already_ordered_is_kept() {
        let gates = xor_gates();
        let order = schedule(n2(), &gates, &[tt(A), tt(B)]).unwrap();
        assert_eq!(order, gates);
    }

    #[test]
    fn test_reversed_xor_is_reordered() {
        let mut gates = xor_gates();
        gates.reverse();
        let order = schedule(n2(), &gates, &[tt(A), tt(B)]).unwrap();

        assert_eq!(order.len(), 4);
        assert!(position(&order, 0b0111) < position(&order, 0b1011));
        assert!(position(&order, 0b0111) < position(&order, 0b1101));
        assert!(position(&order, 0b1011) < position(&order, 0b0110));
        assert!(position(&order, 0b1101) < position(&order, 0b0110));
        // g3 is declared before g2 in the reversed list.
        assert_eq!(order[1].output(), tt(0b1101));
    }

    #[test]
    fn test_permutations_schedule_every_gate() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let inputs = [tt(A), tt(B)];
        for _ in 0..32 {
            let mut gates = xor_gates();
            gates.shuffle(&mut rng);
            let order = schedule(n2(), &gates, &inputs).unwrap();
            assert_eq!(order.len(), gates.len());

            let mut seen = inputs.to_vec();
            for gate in &order {
                assert!(gate.sources().iter().all(|s| seen.contains(s)));
                seen.push(gate.output());
            }
        }
    }

    #[test]
    fn test_two_gate_cycle() {
        let gates = vec![
            Gate::not(tt(0b0011), tt(0b1100)),
            Gate::not(tt(0b1100), tt(0b0011)),
        ];
        let err = schedule(n2(), &gates, &[tt(A)]).unwrap_err();
        match err {
            ValidationError::CycleDetected { stalled } => {
                let stalled = stalled.iter().map(|b| b.table()).collect::<Vec<_>>();
                assert_eq!(stalled, vec![tt(0b0011), tt(0b1100)]);
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_behind_ready_gates() {
        let gates = vec![
            Gate::nand(tt(0b0001), tt(0b1110), tt(0b1111)),
            Gate::not(tt(0b0101), tt(A)),
            Gate::or(tt(0b1110), vec![tt(0b0001), tt(0b0101)]),
        ];
        let err = schedule(n2(), &gates, &[tt(A), tt(0b1111)]).unwrap_err();
        assert!(matches!(err, ValidationError::CycleDetected { ref stalled } if stalled.len() == 2));
    }

    #[test]
    fn test_unreachable_source() {
        let gates = vec![Gate::not(tt(0b1010), tt(0b0101))];
        let err = schedule(n2(), &gates, &[tt(B)]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnreachableSource {
                missing: n2().bits(tt(0b0101))
            }
        );
    }

    #[test]
    fn test_unreachable_wins_over_cycle() {
        let gates = vec![
            Gate::not(tt(0b0011), tt(0b1100)),
            Gate::not(tt(0b1100), tt(0b0011)),
            Gate::nand(tt(0b1111), tt(0b0011), tt(0b0001)),
        ];
        let err = schedule(n2(), &gates, &[tt(A)]).unwrap_err();
        assert!(matches!(err, ValidationError::UnreachableSource { .. }));
    }

    #[test]
    fn test_empty_circuit() {
        assert_eq!(schedule(n2(), &[], &[tt(A)]).unwrap(), vec![]);
    }
}
