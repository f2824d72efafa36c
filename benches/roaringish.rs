use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use boolscan::{PackedPostings, Postings, RoaringPostings, SortedPostings};

fn doc_ids(num_groups: u32, per_group: u32) -> Vec<u32> {
    let mut v = Vec::with_capacity((num_groups * per_group) as usize);
    for i in 0..num_groups {
        let group = i * 16;
        for i in 0..per_group {
            v.push(group + i);
        }
    }
    v
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_sorted");

    group
        .warm_up_time(std::time::Duration::from_secs(2))
        .measurement_time(std::time::Duration::from_secs(5));

    let sets = vec![
        (
            "small",
            vec![
                ("8/1", doc_ids(8, 1)),
                ("4/2", doc_ids(4, 2)),
                ("3/7", doc_ids(3, 7)),
                ("7/3", doc_ids(7, 3)),
            ],
        ),
        (
            "medium",
            vec![
                ("16/2", doc_ids(16, 2)),
                ("32/2", doc_ids(32, 2)),
                ("17/3", doc_ids(17, 3)),
                ("7/12", doc_ids(7, 12)),
            ],
        ),
        (
            "big",
            vec![
                ("300/4", doc_ids(300, 4)),
                ("100/16", doc_ids(100, 16)),
                ("3677/7", doc_ids(3677, 7)),
                ("16000/16", doc_ids(16000, 16)),
            ],
        ),
    ];

    for (id, set) in sets.iter() {
        for (l, doc_ids) in set.iter() {
            group.bench_function(format!("sorted/{id}/{l}"), |b| {
                b.iter(|| SortedPostings::from_sorted(black_box(doc_ids)))
            });
            group.bench_function(format!("roaring/{id}/{l}"), |b| {
                b.iter(|| RoaringPostings::from_sorted(black_box(doc_ids)))
            });
            group.bench_function(format!("packed/{id}/{l}"), |b| {
                b.iter(|| PackedPostings::from_sorted(black_box(doc_ids)))
            });
        }
    }
    group.finish();

    // draining is where the packed layout pays off or not
    let mut group = c.benchmark_group("drain");
    let big = doc_ids(16000, 7);
    let sorted = SortedPostings::from_sorted(&big);
    let roaring = RoaringPostings::from_sorted(&big);
    let packed = PackedPostings::from_sorted(&big);
    group.bench_function("sorted", |b| {
        b.iter_batched(|| &sorted, |p| p.to_vec(), BatchSize::SmallInput)
    });
    group.bench_function("roaring", |b| {
        b.iter_batched(|| &roaring, |p| p.to_vec(), BatchSize::SmallInput)
    });
    group.bench_function("packed", |b| {
        b.iter_batched(|| &packed, |p| p.to_vec(), BatchSize::SmallInput)
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
