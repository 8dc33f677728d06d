use criterion::{criterion_group, criterion_main, Criterion};
use varkernel::kmer::KmerCounts;
use varkernel::mismatch::MismatchKernel;
use varkernel::spectrum::SpectrumScore;
use varkernel::NUCLEOTIDES;

fn window(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            NUCLEOTIDES[(state % 4) as usize]
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let wild_type = window(200, 0x9e37_79b9);
    let mut mutant = wild_type.clone();
    mutant[100] = if mutant[100] == b'A' { b'C' } else { b'A' };

    c.bench_function("kmer counts k=5", |b| {
        b.iter(|| KmerCounts::new(&wild_type, 5))
    });
    c.bench_function("spectrum k=3", |b| {
        b.iter(|| SpectrumScore::from_sequences(&wild_type, &mutant, 3))
    });

    let kernel = MismatchKernel::new(5, 1).unwrap();
    c.bench_function("mismatch k=5 m=1", |b| {
        b.iter(|| kernel.score(&wild_type, &mutant))
    });
    let kernel = MismatchKernel::new(8, 2).unwrap();
    c.bench_function("mismatch k=8 m=2", |b| {
        b.iter(|| kernel.score(&wild_type, &mutant))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
