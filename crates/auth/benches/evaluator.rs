use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use tradedesk_auth::{Identity, Permission, Role, has_all_permissions, has_permission};
use tradedesk_core::UserId;

fn identity_with(grants: usize) -> Identity {
    let role = Role::new("Sales Agent")
        .with_permissions(Permission::ALL.iter().copied().take(grants));
    Identity::new(UserId::new(), "bench").with_role(role)
}

fn bench_has_permission(c: &mut Criterion) {
    let mut group = c.benchmark_group("has_permission");

    for grants in [1usize, 8, Permission::ALL.len()] {
        let identity = identity_with(grants);
        let last = Permission::ALL[grants - 1];

        group.bench_with_input(BenchmarkId::new("hit_last", grants), &identity, |b, id| {
            b.iter(|| has_permission(black_box(Some(id)), black_box(last)))
        });
        group.bench_with_input(BenchmarkId::new("miss", grants), &identity, |b, id| {
            b.iter(|| has_permission(black_box(Some(id)), black_box("view_invoice")))
        });
    }

    group.finish();
}

fn bench_has_all(c: &mut Criterion) {
    let identity = identity_with(Permission::ALL.len());
    c.bench_function("has_all_permissions/full_catalog", |b| {
        b.iter(|| has_all_permissions(black_box(Some(&identity)), black_box(Permission::ALL)))
    });
}

criterion_group!(benches, bench_has_permission, bench_has_all);
criterion_main!(benches);
