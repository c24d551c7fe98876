use super::*;
use glam::{DVec2, DVec3, DVec4, IVec2, IVec3, IVec4, Mat3, Mat4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};

// ============================================================================
// Raw bytes
// ============================================================================

#[test]
fn test_len_and_is_empty() {
    let mut bytes = [0u8; 10];
    let view = BufferView::new(&mut bytes);
    assert_eq!(view.len(), 10);
    assert!(!view.is_empty());

    let mut empty: [u8; 0] = [];
    assert!(BufferView::new(&mut empty).is_empty());
}

#[test]
fn test_get_bytes_within_bounds() {
    let mut bytes = [1u8, 2, 3, 4, 5];
    let view = BufferView::new(&mut bytes);
    assert_eq!(view.get_bytes(1, 3).unwrap(), &[2, 3, 4]);
    assert_eq!(view.get_bytes(5, 0).unwrap(), &[] as &[u8]);
    assert_eq!(view.get_bytes(0, 5).unwrap(), &[1, 2, 3, 4, 5]);
}

#[test]
fn test_get_bytes_out_of_bounds() {
    let mut bytes = [0u8; 4];
    let view = BufferView::new(&mut bytes);
    assert_eq!(
        view.get_bytes(2, 3),
        Err(Error::OutOfBounds { offset: 2, length: 3, size: 4 })
    );
    assert!(view.get_bytes(usize::MAX, 2).is_err());
}

#[test]
fn test_set_bytes_rejects_partial_write() {
    let mut bytes = [0u8; 4];
    let mut view = BufferView::new(&mut bytes);

    assert!(view.set_bytes(2, &[9, 9, 9]).is_err());
    assert_eq!(view.as_bytes(), &[0, 0, 0, 0]);

    view.set_bytes(2, &[9, 9]).unwrap();
    assert_eq!(view.as_bytes(), &[0, 0, 9, 9]);
}

#[test]
fn test_as_bytes_mut_writes_through() {
    let mut bytes = [0u8; 3];
    {
        let mut view = BufferView::new(&mut bytes);
        view.as_bytes_mut()[1] = 42;
    }
    assert_eq!(bytes, [0, 42, 0]);
}

// ============================================================================
// Typed access
// ============================================================================

/// Element `i` of size `E` fits in `S` bytes iff `(i + 1) * E <= S`
fn check_bounds<T: Std430Element + Copy + PartialEq + std::fmt::Debug>(value: T) {
    let element = TypeSize::of::<T>().size_bytes();
    for size in [element - 1, element, 3 * element, 3 * element + 1] {
        let mut bytes = vec![0u8; size];
        let mut view = BufferView::new(&mut bytes);
        for index in 0..4 {
            let fits = (index + 1) * element <= size;
            assert_eq!(view.set(index, value).is_ok(), fits, "set index {} size {}", index, size);
            match view.get::<T>(index) {
                Ok(read) => {
                    assert!(fits);
                    assert_eq!(read, value);
                }
                Err(error) => {
                    assert!(!fits);
                    assert_eq!(
                        error,
                        Error::OutOfBounds { offset: index * element, length: element, size }
                    );
                }
            }
        }
    }
}

#[test]
fn test_bounds_invariant_scalars() {
    check_bounds(true);
    check_bounds(-7i32);
    check_bounds(7u32);
    check_bounds(1.25f32);
    check_bounds(-2.5f64);
}

#[test]
fn test_bounds_invariant_vectors_and_matrices() {
    check_bounds(IVec2::new(-1, 2));
    check_bounds(IVec3::new(-1, 2, -3));
    check_bounds(IVec4::new(-1, 2, -3, 4));
    check_bounds(UVec2::new(1, 2));
    check_bounds(UVec3::new(1, 2, 3));
    check_bounds(UVec4::new(1, 2, 3, 4));
    check_bounds(Vec2::new(0.5, 1.5));
    check_bounds(Vec3::new(1.0, 2.0, 3.0));
    check_bounds(Vec4::new(1.0, 2.0, 3.0, 4.0));
    check_bounds(DVec2::new(1.0, -1.0));
    check_bounds(DVec3::new(1.0, -1.0, 0.25));
    check_bounds(DVec4::new(1.0, -1.0, 0.25, 8.0));
    check_bounds(Mat3::from_diagonal(Vec3::new(1.0, 2.0, 3.0)));
    check_bounds(Mat4::IDENTITY);
}

#[test]
fn test_typed_index_is_element_index() {
    let mut bytes = [0u8; 12];
    let mut view = BufferView::new(&mut bytes);
    view.set::<f32>(2, 3.5).unwrap();

    assert_eq!(view.get_bytes(8, 4).unwrap(), &3.5f32.to_ne_bytes());
    assert_eq!(view.get::<f32>(0).unwrap(), 0.0);
}

#[test]
fn test_vec3_elements_are_packed() {
    let mut bytes = [0u8; 24];
    let mut view = BufferView::new(&mut bytes);
    view.set(1, Vec3::new(4.0, 5.0, 6.0)).unwrap();

    assert_eq!(view.get::<f32>(3).unwrap(), 4.0);
    assert_eq!(view.get::<f32>(5).unwrap(), 6.0);
}

#[test]
fn test_bool_round_trip_and_encoding() {
    let mut bytes = [0xAAu8; 8];
    let mut view = BufferView::new(&mut bytes);

    view.set(0, true).unwrap();
    view.set(1, false).unwrap();

    assert_eq!(view.get_bytes(0, 4).unwrap(), &1i32.to_ne_bytes());
    assert_eq!(view.get_bytes(4, 4).unwrap(), &[0, 0, 0, 0]);
    assert!(view.get::<bool>(0).unwrap());
    assert!(!view.get::<bool>(1).unwrap());
}

#[test]
fn test_element_count_ignores_trailing_bytes() {
    let mut bytes = [0u8; 30];
    let view = BufferView::new(&mut bytes);
    assert_eq!(view.element_count::<f32>(), 7);
    assert_eq!(view.element_count::<f64>(), 3);
    assert_eq!(view.element_count::<Mat4>(), 0);
}

#[test]
fn test_huge_index_does_not_overflow() {
    let mut bytes = [0u8; 8];
    let view = BufferView::new(&mut bytes);
    assert!(matches!(view.get::<f64>(usize::MAX), Err(Error::OutOfBounds { .. })));
}

// ============================================================================
// Iteration
// ============================================================================

#[test]
fn test_iter_yields_every_element_with_index() {
    let mut bytes = [0u8; 18];
    let mut view = BufferView::new(&mut bytes);
    for i in 0..4 {
        view.set(i, i as u32 * 10).unwrap();
    }

    let items: Vec<(usize, u32)> = view.iter::<u32>().collect();
    assert_eq!(items, vec![(0, 0), (1, 10), (2, 20), (3, 30)]);
}

#[test]
fn test_iter_is_exact_size() {
    let mut bytes = [0u8; 20];
    let view = BufferView::new(&mut bytes);
    let mut iter = view.iter::<Vec2>();
    assert_eq!(iter.len(), 2);
    iter.next();
    assert_eq!(iter.len(), 1);
    iter.next();
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next(), None);
}

#[test]
fn test_iter_restarts_and_stops_early() {
    let mut bytes = [0u8; 16];
    let mut view = BufferView::new(&mut bytes);
    for i in 0..4 {
        view.set(i, i as i32).unwrap();
    }

    let first_two: Vec<i32> = view.iter::<i32>().take(2).map(|(_, v)| v).collect();
    assert_eq!(first_two, vec![0, 1]);

    let found = view.iter::<i32>().find(|(_, v)| *v == 2);
    assert_eq!(found, Some((2, 2)));

    // A new iterator starts over at element 0
    assert_eq!(view.iter::<i32>().next(), Some((0, 0)));
}

#[test]
fn test_iter_empty_view() {
    let mut bytes = [0u8; 3];
    let view = BufferView::new(&mut bytes);
    assert_eq!(view.iter::<f32>().count(), 0);
}
