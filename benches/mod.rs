use criterion::{criterion_group, criterion_main};


use chain::register_benchmarks as register_chain_benchmarks;
use codec::register_benchmarks as register_codec_benchmarks;

criterion_group!(benches, register_chain_benchmarks, register_codec_benchmarks);

criterion_main!(benches);
