use axum::{
    Router,
    routing::{get, patch, post, put},
};

use courtside_core::health::healthz;
use courtside_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    auth::{logout, me, send_otp, verify_otp},
    health::readyz,
    organizer_team::{
        accept_invitation, add_existing_manager, check_permission, create_manager, get_manager,
        list_invitations, list_managers, reject_invitation, remove_manager, send_invitation,
        update_manager,
    },
    professionals::{self, book_professional, check_duplicate, create_availability},
    tournaments::{
        create_team, create_tournament, delete_tournament, list_registrations, register_team,
        update_tournament,
    },
    venues::{self, create_venue, list_slots, my_bookings, reserve_slot, split_pay},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/auth/send-otp", post(send_otp))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
        // Organizer team
        .route(
            "/organizer-team/managers",
            get(list_managers).post(create_manager),
        )
        .route(
            "/organizer-team/managers/add-existing",
            post(add_existing_manager),
        )
        .route(
            "/organizer-team/managers/{id}",
            get(get_manager).patch(update_manager).delete(remove_manager),
        )
        .route("/organizer-team/invitations", get(list_invitations))
        .route("/organizer-team/invitations/send", post(send_invitation))
        .route(
            "/organizer-team/invitations/{id}/accept",
            post(accept_invitation),
        )
        .route(
            "/organizer-team/invitations/{id}/reject",
            post(reject_invitation),
        )
        .route("/organizer-team/check-permission", get(check_permission))
        // Venues
        .route("/venues", post(create_venue))
        .route("/venues/{id}/slots", get(list_slots))
        .route("/venues/bookings", post(reserve_slot))
        .route("/venues/bookings/mine", get(my_bookings))
        .route(
            "/venues/bookings/{id}/cancel",
            post(venues::cancel_booking),
        )
        .route("/venues/bookings/{id}/split-pay", post(split_pay))
        // Professionals
        .route("/professionals/availability", post(create_availability))
        .route(
            "/professionals/bookings",
            post(book_professional).get(professionals::list_bookings),
        )
        .route(
            "/professionals/bookings/{id}",
            put(professionals::update_booking_status),
        )
        .route(
            "/professionals/bookings/check-duplicate/{tournament_id}/{availability_id}",
            get(check_duplicate),
        )
        .route(
            "/professionals/bookings/{id}/cancel",
            post(professionals::cancel_booking),
        )
        // Tournaments
        .route("/tournaments", post(create_tournament))
        .route("/tournaments/teams", post(create_team))
        .route(
            "/tournaments/{id}",
            patch(update_tournament).delete(delete_tournament),
        )
        .route("/tournaments/{id}/register", post(register_team))
        .route("/tournaments/{id}/registrations", get(list_registrations))
        .layer(trace_layer())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
