//! The bridge holds no shared state, so independent calls on disjoint buffers can run on any thread.

use crate::{memczero, sha256_into, EraseFlag, ProofScalar, SurjectionProof};
use std::thread;

#[test]
fn parallel_digests_on_disjoint_buffers() {
    let inputs: Vec<Vec<u8>> = (0..8u8).map(|i| vec![i; 1000 * (i as usize + 1)]).collect();
    let mut outputs = vec![[0u8; 32]; inputs.len()];
    thread::scope(|s| {
        for (input, output) in inputs.iter().zip(outputs.iter_mut()) {
            s.spawn(move || sha256_into(output, input, input.len()).unwrap());
        }
    });
    for (input, output) in inputs.iter().zip(outputs.iter()) {
        let mut expected = [0u8; 32];
        sha256_into(&mut expected, input, input.len()).unwrap();
        assert_eq!(*output, expected);
    }
}

#[test]
fn parallel_erase_on_disjoint_regions() {
    let mut regions = vec![[0xFFu8; 64]; 8];
    thread::scope(|s| {
        for (i, region) in regions.iter_mut().enumerate() {
            s.spawn(move || memczero(region, 64, EraseFlag::from(i % 2 == 0)).unwrap());
        }
    });
    for (i, region) in regions.iter().enumerate() {
        let expected = if i % 2 == 0 { 0x00 } else { 0xFF };
        assert!(region.iter().all(|b| *b == expected));
    }
}

#[test]
fn proofs_can_be_shared_across_threads() {
    let proof =
        SurjectionProof::from_used_indices(3, &[1], ProofScalar::from([5u8; 32]), vec![ProofScalar::from([6u8; 32])])
            .unwrap();
    let bytes = proof.serialize();
    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| assert_eq!(SurjectionProof::parse(&bytes).unwrap(), proof));
        }
    });
}
