use super::*;

#[test]
fn flush_concatenates_in_partition_order() {
    let mut list = PartitionedList::<u32>::new(3);
    list.push_to(2, 20);
    list.push_to(0, 1);
    list.push_to(1, 10);
    list.push_to(0, 2);
    list.push_to(2, 21);
    list.flush();
    assert_eq!(list.as_slice(), &[1, 2, 10, 20, 21]);
    for i in 0..3 {
        assert_eq!(list.partition_len(i), 0);
    }
}

#[test]
fn flush_replaces_previous_main_contents() {
    let mut list = PartitionedList::<u32>::new(2);
    list.extend_from_slice(&[7, 8, 9]);
    list.push_to(1, 5);
    list.flush();
    assert_eq!(list.as_slice(), &[5]);
}

#[test]
fn strided_flush_restores_original_indices() {
    let n = 3;
    let mut list = PartitionedList::<usize>::new(n);
    let items: Vec<usize> = (0..8).collect();
    for k in 0..n {
        let writer = list.writer(k);
        let mut out = writer.lock();
        for i in (k..items.len()).step_by(n) {
            out.push(items[i] * 10);
        }
    }
    list.flush_strided();
    assert_eq!(list.as_slice(), &[0, 10, 20, 30, 40, 50, 60, 70]);
}

#[test]
fn writers_append_from_other_threads() {
    let mut list = PartitionedList::<usize>::new(4);
    let handles: Vec<_> = (0..4)
        .map(|k| {
            let writer = list.writer(k);
            std::thread::spawn(move || {
                let mut out = writer.lock();
                for i in 0..100 {
                    out.push(k * 1000 + i);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    list.flush();
    assert_eq!(list.len(), 400);
    assert_eq!(list.as_slice()[0], 0);
    assert_eq!(list.as_slice()[100], 1000);
    assert_eq!(list.as_slice()[399], 3099);
}

#[test]
fn snapshot_is_stable_while_main_mutates() {
    let mut list = PartitionedList::<u8>::new(1);
    list.extend_from_slice(&[1, 2]);
    let snap = list.snapshot();
    list.push(3);
    assert_eq!(snap.as_slice(), &[1, 2]);
    assert_eq!(list.as_slice(), &[1, 2, 3]);
}

#[test]
fn clear_empties_everything() {
    let mut list = PartitionedList::<u8>::new(2);
    list.push(1);
    list.push_to(1, 2);
    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.partition_len(1), 0);
}
