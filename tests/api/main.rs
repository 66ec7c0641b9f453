mod health_check;
mod postgres_registry;
mod subscriptions;
