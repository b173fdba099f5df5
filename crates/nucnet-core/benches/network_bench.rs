// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Network Kernel Benchmark
// © 1998–2026 Miroslav Šotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

use criterion::{criterion_group, criterion_main, Criterion};
use nucnet_core::network::Network;
use nucnet_core::reaction::{RateData, Reaction, ReactionCatalog};
use nucnet_core::species::{species_name, Species, SpeciesCatalog};
use nucnet_core::zone::Zone;
use nucnet_types::state::ZoneLabel;
use rand::Rng;
use std::hint::black_box;

const Z_MAX: u32 = 20;

/// Mass excess from a flat 8 MeV per nucleon binding.
fn rough_mass_excess(z: u32, a: u32) -> f64 {
    7.288_971 * z as f64 + 8.071_323 * (a - z) as f64 - 8.0 * a as f64
}

/// Isotopes A = 2Z-1 ..= 2Z+2 up to Z_MAX with neutron, proton and alpha
/// captures between them.
fn capture_network() -> Network {
    let mut nuc = SpeciesCatalog::new();
    nuc.add(Species::new(0, 1, 8.071_323).unwrap()).unwrap();
    nuc.add(Species::new(1, 1, 7.288_971).unwrap()).unwrap();
    nuc.add(Species::new(2, 4, 2.424_916).unwrap()).unwrap();
    for z in 1..=Z_MAX {
        for a in (2 * z).saturating_sub(1).max(z + 1)..=2 * z + 2 {
            let sp = Species::new(z, a, rough_mass_excess(z, a)).unwrap();
            if !nuc.contains(sp.name()) {
                nuc.add(sp).unwrap();
            }
        }
    }

    let mut reac = ReactionCatalog::new();
    let targets: Vec<(u32, u32, String)> = nuc
        .iter()
        .filter(|sp| sp.z() > 0 && sp.a() > 1)
        .map(|sp| (sp.z(), sp.a(), sp.name().to_string()))
        .collect();
    for (z, a, name) in &targets {
        for (projectile, dz, da) in [("n", 0, 1), ("h1", 1, 1), ("he4", 2, 4)] {
            let Ok(product) = species_name(z + dz, a + da, None) else {
                continue;
            };
            if nuc.contains(&product) {
                reac.add(
                    Reaction::new()
                        .reactant(name)
                        .reactant(projectile)
                        .product(&product)
                        .product("gamma")
                        .with_rate(RateData::Single(1.0e-3)),
                );
            }
        }
    }
    Network::new(nuc, reac)
}

fn random_zone(net: &Network) -> Zone {
    let mut rng = rand::thread_rng();
    let mut zone = Zone::new(net, ZoneLabel::single("bench"));
    for sp in net.species().iter() {
        let y: f64 = rng.gen_range(1e-8..1e-2);
        zone.update_species_abundance(net, sp.name(), y)
            .expect("species is in the network");
    }
    zone
}

fn bench_network_kernels(c: &mut Criterion) {
    let net = capture_network();
    let mut group = c.benchmark_group("network_kernels");

    group.bench_function("compute_rates", |b| {
        b.iter_batched(
            || random_zone(&net),
            |mut zone| {
                zone.compute_rates(&net, 3.0, 1.0e6)
                    .expect("rates should compute");
                black_box(zone.number_of_cached_rates());
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("jacobian_matrix", |b| {
        let mut zone = random_zone(&net);
        zone.compute_rates(&net, 3.0, 1.0e6)
            .expect("rates should compute");
        b.iter(|| {
            let m = zone
                .compute_jacobian_matrix(&net)
                .expect("jacobian should assemble");
            black_box(m.nnz());
        })
    });

    group.bench_function("flow_vector", |b| {
        let mut zone = random_zone(&net);
        zone.compute_rates(&net, 3.0, 1.0e6)
            .expect("rates should compute");
        b.iter(|| {
            let dydt = zone
                .compute_flow_vector(&net)
                .expect("flows should assemble");
            black_box(dydt[0]);
        })
    });

    group.finish();
}

criterion_group!(benches, bench_network_kernels);
criterion_main!(benches);
