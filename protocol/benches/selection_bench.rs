// Voter-selection and commit-verification benchmarks.
//
// Covers deterministic sampling at various validator-set sizes, VoterSet
// wire round-trips, and full/light commit verification.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use nova_protocol::commit::{vote_sign_bytes, Commit, CommitSig};
use nova_protocol::crypto::keys::Ed25519Keypair;
use nova_protocol::selector::select_voters;
use nova_protocol::validator::{Validator, ValidatorSet};
use nova_protocol::voter_params::default_voter_params;
use nova_protocol::{BlockId, PartSetHeader};

fn build_validator_set(size: usize) -> ValidatorSet {
    let validators: Vec<Validator> = (0..size)
        .map(|i| {
            let keypair = Ed25519Keypair::generate();
            Validator::new(Box::new(keypair.public_key()), 100 + i as i64)
        })
        .collect();
    ValidatorSet::new(validators).unwrap()
}

fn bench_select_voters(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector/select_voters");
    let params = default_voter_params();
    let proof_hash = [7u8; 32];

    for size in [10, 50, 100, 500] {
        let validator_set = build_validator_set(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &validator_set, |b, validator_set| {
            b.iter(|| select_voters(validator_set, &proof_hash, &params).unwrap());
        });
    }

    group.finish();
}

fn bench_voter_set_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("voter_set/to_from_bytes");
    let params = default_voter_params();

    for size in [10, 50, 100, 500] {
        let validator_set = build_validator_set(size);
        let voter_set = select_voters(&validator_set, &[7u8; 32], &params).unwrap();
        let bytes = voter_set.to_bytes();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| nova_protocol::VoterSet::from_bytes(bytes).unwrap());
        });
    }

    group.finish();
}

fn bench_voter_set_hash(c: &mut Criterion) {
    let params = default_voter_params();
    let validator_set = build_validator_set(100);
    let voter_set = select_voters(&validator_set, &[7u8; 32], &params).unwrap();

    c.bench_function("voter_set/hash", |b| {
        b.iter(|| voter_set.hash());
    });
}

fn build_signed_commit(keypairs: &[Ed25519Keypair], voter_set: &nova_protocol::VoterSet, chain_id: &str, block_id: BlockId, height: i64) -> Commit {
    let n = voter_set.size();
    let mut commit = Commit::new(height, 0, block_id, vec![CommitSig::absent(); n]);
    for i in 0..n {
        let address = voter_set.get_by_index(i).unwrap().address;
        let timestamp = chrono::Utc::now();
        let mut staged = commit.clone();
        staged.signatures[i] = CommitSig::for_block(address, timestamp, block_id, vec![0u8; 64]);
        let sign_bytes = vote_sign_bytes(chain_id, i, &staged);
        let signature = keypairs[i].sign(&sign_bytes);
        commit.signatures[i] = CommitSig::for_block(address, timestamp, block_id, signature);
    }
    commit
}

fn bench_verify_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("threshold/verify_commit");
    let chain_id = "bench-chain";
    let block_id = BlockId::new([3u8; 32], PartSetHeader::new(1, [4u8; 32]));
    let height = 10;

    for size in [10, 50, 100] {
        let keypairs: Vec<Ed25519Keypair> = (0..size).map(|_| Ed25519Keypair::generate()).collect();
        let validators: Vec<Validator> = keypairs
            .iter()
            .map(|kp| Validator::new(Box::new(kp.public_key()), 100))
            .collect();
        let validator_set = ValidatorSet::new(validators).unwrap();
        let voter_set = select_voters(&validator_set, &[], &default_voter_params()).unwrap();
        let commit = build_signed_commit(&keypairs, &voter_set, chain_id, block_id, height);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &(voter_set, commit), |b, (voter_set, commit)| {
            b.iter(|| voter_set.verify_commit(chain_id, block_id, height, commit).unwrap());
        });
    }

    group.finish();
}

fn bench_verify_commit_light(c: &mut Criterion) {
    let mut group = c.benchmark_group("threshold/verify_commit_light");
    let chain_id = "bench-chain";
    let block_id = BlockId::new([3u8; 32], PartSetHeader::new(1, [4u8; 32]));
    let height = 10;

    for size in [10, 50, 100] {
        let keypairs: Vec<Ed25519Keypair> = (0..size).map(|_| Ed25519Keypair::generate()).collect();
        let validators: Vec<Validator> = keypairs
            .iter()
            .map(|kp| Validator::new(Box::new(kp.public_key()), 100))
            .collect();
        let validator_set = ValidatorSet::new(validators).unwrap();
        let voter_set = select_voters(&validator_set, &[], &default_voter_params()).unwrap();
        let commit = build_signed_commit(&keypairs, &voter_set, chain_id, block_id, height);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &(voter_set, commit), |b, (voter_set, commit)| {
            b.iter(|| voter_set.verify_commit_light(chain_id, block_id, height, commit).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_select_voters,
    bench_voter_set_roundtrip,
    bench_voter_set_hash,
    bench_verify_commit,
    bench_verify_commit_light,
);
criterion_main!(benches);
