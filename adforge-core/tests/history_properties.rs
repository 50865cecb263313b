//! History Property Tests
//!
//! Random edit sequences against a populated session.

use adforge_core::{
    AlignEdge, AspectRatio, ElementId, ElementTemplate, FlipAxis, InteractionConfig, ReorderMove,
    Session,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    Nudge(usize, i8, i8),
    Reorder(usize, ReorderMove),
    Duplicate(usize),
    Flip(usize, bool),
    Align(usize, AlignEdge),
    BackgroundOpacity(u8),
    Delete(usize),
}

fn arb_move() -> impl Strategy<Value = ReorderMove> {
    prop_oneof![
        Just(ReorderMove::Front),
        Just(ReorderMove::Back),
        Just(ReorderMove::Forward),
        Just(ReorderMove::Backward),
    ]
}

fn arb_edge() -> impl Strategy<Value = AlignEdge> {
    prop_oneof![
        Just(AlignEdge::Left),
        Just(AlignEdge::CenterHorizontal),
        Just(AlignEdge::Right),
        Just(AlignEdge::Top),
        Just(AlignEdge::Middle),
        Just(AlignEdge::Bottom),
    ]
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (any::<usize>(), any::<i8>(), any::<i8>()).prop_map(|(i, dx, dy)| Edit::Nudge(i, dx, dy)),
        (any::<usize>(), arb_move()).prop_map(|(i, mv)| Edit::Reorder(i, mv)),
        any::<usize>().prop_map(Edit::Duplicate),
        (any::<usize>(), any::<bool>()).prop_map(|(i, h)| Edit::Flip(i, h)),
        (any::<usize>(), arb_edge()).prop_map(|(i, e)| Edit::Align(i, e)),
        any::<u8>().prop_map(Edit::BackgroundOpacity),
        any::<usize>().prop_map(Edit::Delete),
    ]
}

fn populated() -> Session {
    let mut session = Session::new(AspectRatio::Square);
    session.add_element(&ElementTemplate::Heading);
    session.add_element(&ElementTemplate::Rectangle);
    session.add_element(&ElementTemplate::Cta);
    let scene = session.scene().clone();
    Session::from_scene(scene, InteractionConfig::default())
}

fn pick(session: &Session, index: usize) -> Option<ElementId> {
    let order = session.scene().paint_order();
    if order.is_empty() {
        None
    } else {
        Some(order[index % order.len()].id)
    }
}

fn target_index(edit: &Edit) -> usize {
    match edit {
        Edit::BackgroundOpacity(_) => 0,
        Edit::Nudge(i, ..)
        | Edit::Reorder(i, _)
        | Edit::Duplicate(i)
        | Edit::Flip(i, _)
        | Edit::Align(i, _)
        | Edit::Delete(i) => *i,
    }
}

fn apply(session: &mut Session, edit: &Edit) {
    let Some(id) = pick(session, target_index(edit)) else {
        return;
    };
    match edit {
        Edit::Nudge(_, dx, dy) => {
            session
                .nudge(&[id], f32::from(*dx), f32::from(*dy))
                .expect("nudge");
        }
        Edit::Reorder(_, mv) => {
            session.reorder(id, *mv).expect("reorder");
        }
        Edit::Duplicate(_) => {
            session.duplicate_elements(&[id]).expect("duplicate");
        }
        Edit::Flip(_, horizontal) => {
            let axis = if *horizontal {
                FlipAxis::Horizontal
            } else {
                FlipAxis::Vertical
            };
            session.flip(&[id], axis).expect("flip");
        }
        Edit::Align(_, edge) => {
            session.align_to_page(&[id], *edge).expect("align");
        }
        Edit::BackgroundOpacity(v) => {
            session.set_background_opacity(f32::from(*v) / 255.0);
        }
        Edit::Delete(_) => {
            session.delete_elements(&[id]).expect("delete");
        }
    }
}

proptest! {
    #[test]
    fn prop_undo_all_restores_initial_scene(edits in prop::collection::vec(arb_edit(), 0..=20)) {
        let mut session = populated();
        let initial = session.scene().clone();
        for edit in &edits {
            apply(&mut session, edit);
        }
        let committed = session.history().cursor();
        prop_assert!(committed <= edits.len());
        let edited = session.scene().clone();

        for _ in 0..committed {
            prop_assert!(session.undo());
        }
        prop_assert!(!session.undo());
        prop_assert_eq!(session.scene(), &initial);

        for _ in 0..committed {
            prop_assert!(session.redo());
        }
        prop_assert!(!session.redo());
        prop_assert_eq!(session.scene(), &edited);
    }

    #[test]
    fn prop_front_paints_last(index in any::<usize>(), edits in prop::collection::vec(arb_edit(), 0..8)) {
        let mut session = populated();
        for edit in &edits {
            apply(&mut session, edit);
        }
        let Some(id) = pick(&session, index) else {
            return Ok(());
        };
        session.reorder(id, ReorderMove::Front).expect("front");
        let order = session.scene().paint_order();
        prop_assert_eq!(order.last().map(|e| e.id), Some(id));

        let before = session.history().len();
        prop_assert!(!session.reorder(id, ReorderMove::Forward).expect("forward"));
        prop_assert_eq!(session.history().len(), before);
    }

    #[test]
    fn prop_duplicates_are_offset_copies(count in 1usize..4) {
        let mut session = populated();
        let sources: Vec<ElementId> = session
            .scene()
            .paint_order()
            .iter()
            .take(count)
            .map(|e| e.id)
            .collect();
        let copies = session.duplicate_elements(&sources).expect("duplicate");
        prop_assert_eq!(copies.len(), sources.len());

        for (src, copy) in sources.iter().zip(&copies) {
            prop_assert_ne!(src, copy);
            let a = session.scene().get_element(*src).expect("source");
            let b = session.scene().get_element(*copy).expect("copy");
            prop_assert!((b.transform.x - a.transform.x - 20.0).abs() < 1e-3);
            prop_assert!((b.transform.y - a.transform.y - 20.0).abs() < 1e-3);
            prop_assert_eq!(&a.kind, &b.kind);
            prop_assert_eq!(&a.style.color, &b.style.color);
            prop_assert_eq!(a.style.font_size, b.style.font_size);
        }
    }
}
