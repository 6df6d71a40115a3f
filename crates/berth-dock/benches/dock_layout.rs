//! Benchmarks for dock layout passes

use berth_dock::{
    DockConfig, DockSide, DockSlot, Panel, PanelId, PanelRegistry, Placement, Rect, Size,
    compute_dock_geometry, layout_dock,
};
use berth_test_utils::MockHost;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

const VIEWPORT: Size = Size::new(1920.0, 1080.0);

/// `rows` rows on the left dock, each split into `columns` columns of two stacked panels.
fn populated(config: &DockConfig, rows: u32, columns: u32) -> PanelRegistry {
    let mut registry = PanelRegistry::new(config);
    for row in 0..rows {
        for column in 0..columns {
            for sub_row in 0..2 {
                let id = PanelId::new(format!("panel-{row}-{column}-{sub_row}")).unwrap();
                let mut panel = Panel::new(id, Rect::new(0.0, 0.0, 200.0, 80.0));
                panel.placement =
                    Placement::Docked(DockSlot::new(DockSide::Left, row, column, sub_row));
                registry.insert(panel).unwrap();
            }
        }
    }
    registry
}

fn bench_compute_geometry(c: &mut Criterion) {
    let config = DockConfig::default();
    let mut group = c.benchmark_group("compute_dock_geometry");

    for rows in [2, 8, 32] {
        let registry = populated(&config, rows, 3);
        let content = registry.dock(DockSide::Left).content_rect(VIEWPORT, &config);
        group.throughput(Throughput::Elements(u64::from(rows * 6)));

        group.bench_with_input(BenchmarkId::new("rows", rows), &rows, |b, _| {
            b.iter(|| {
                let panels = registry.docked_panels(DockSide::Left, None);
                compute_dock_geometry(DockSide::Left, black_box(&panels), content, &config)
            });
        });
    }

    group.finish();
}

fn bench_layout_dock(c: &mut Criterion) {
    let config = DockConfig::default();
    let mut group = c.benchmark_group("layout_dock");

    for rows in [2, 8, 32] {
        let mut registry = populated(&config, rows, 3);
        let mut host = MockHost::new(VIEWPORT);
        group.throughput(Throughput::Elements(u64::from(rows * 6)));

        group.bench_with_input(BenchmarkId::new("rows", rows), &rows, |b, _| {
            b.iter(|| {
                host.clear_calls();
                layout_dock(
                    &mut registry,
                    &mut host,
                    &config,
                    black_box(VIEWPORT),
                    DockSide::Left,
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_geometry, bench_layout_dock);
criterion_main!(benches);
