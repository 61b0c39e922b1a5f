//! 이벤트 예약(ocrs_f) 엔드포인트

pub mod get_event_tt_event;
pub mod get_event_tt_yoyaku_moshikomi;
pub mod patch_tt_event;
pub mod patch_tt_yoyaku_moshikomi;
pub mod post_kamoku_reserve_status;
pub mod post_school_tt_moshikomi;

use super::Registry;

pub fn register(registry: &mut Registry) {
    registry.register(get_event_tt_event::PATH, get_event_tt_event::route);
    registry.register(
        get_event_tt_yoyaku_moshikomi::PATH,
        get_event_tt_yoyaku_moshikomi::route,
    );
    registry.register(patch_tt_event::PATH, patch_tt_event::route);
    registry.register(
        patch_tt_yoyaku_moshikomi::PATH,
        patch_tt_yoyaku_moshikomi::route,
    );
    registry.register(
        post_school_tt_moshikomi::PATH,
        post_school_tt_moshikomi::route,
    );
    registry.register(
        post_kamoku_reserve_status::PATH,
        post_kamoku_reserve_status::route,
    );
}
