//! Operation names backing each entity slice.

use super::hook::{EntityApi, SubscriptionSpec, Topic};
use crate::slices::assets::Assets;
use crate::slices::cars::Cars;
use crate::slices::events::Events;
use crate::slices::fleets::Fleets;
use crate::slices::models::Models;
use crate::slices::races::Races;
use std::marker::PhantomData;

const fn upsert(operation: &'static str) -> SubscriptionSpec {
    SubscriptionSpec {
        operation,
        topic: Topic::Upsert,
    }
}

const fn delete(operation: &'static str) -> SubscriptionSpec {
    SubscriptionSpec {
        operation,
        topic: Topic::Delete,
    }
}

pub const CARS_API: EntityApi<Cars> = EntityApi {
    api_name: "carsApi",
    error_header: "Could not load cars",
    list_query: "listCars",
    subscriptions: &[
        upsert("onAddedCar"),
        upsert("onUpdatedCar"),
        delete("onDeletedCar"),
    ],
    owner_field: None,
    slice: PhantomData,
};

pub const FLEETS_API: EntityApi<Fleets> = EntityApi {
    api_name: "fleetsApi",
    error_header: "Could not load fleets",
    list_query: "getAllFleets",
    subscriptions: &[
        upsert("onAddedFleet"),
        upsert("onUpdatedFleet"),
        delete("onDeletedFleet"),
    ],
    owner_field: None,
    slice: PhantomData,
};

/// Non-privileged users only see models whose `sub` is their own.
pub const MODELS_API: EntityApi<Models> = EntityApi {
    api_name: "modelsApi",
    error_header: "Could not load models",
    list_query: "getAllModels",
    subscriptions: &[
        upsert("onAddedModel"),
        upsert("onUpdatedModel"),
        delete("onDeletedModel"),
    ],
    owner_field: Some("sub"),
    slice: PhantomData,
};

pub const ASSETS_API: EntityApi<Assets> = EntityApi {
    api_name: "assetsApi",
    error_header: "Could not load uploads",
    list_query: "listUploadsToCar",
    subscriptions: &[
        upsert("onUploadsToCarCreated"),
        upsert("onUploadsToCarUpdated"),
    ],
    owner_field: None,
    slice: PhantomData,
};

pub const RACES_API: EntityApi<Races> = EntityApi {
    api_name: "racesApi",
    error_header: "Could not load races",
    list_query: "getRaces",
    subscriptions: &[
        upsert("onAddedRace"),
        upsert("onUpdatedRace"),
        delete("onDeletedRace"),
    ],
    owner_field: Some("userId"),
    slice: PhantomData,
};

pub const EVENTS_API: EntityApi<Events> = EntityApi {
    api_name: "eventsApi",
    error_header: "Could not load events",
    list_query: "getEvents",
    subscriptions: &[
        upsert("onAddedEvent"),
        upsert("onUpdatedEvent"),
        delete("onDeletedEvent"),
    ],
    owner_field: None,
    slice: PhantomData,
};
