use super::*;
use crate::db::{PoolSettings, ResolvedSource, init_connection, resolve_connection_url};
use crate::env::{EnvSnapshot, LOCAL_DATABASE_URL};
use crate::schema::SCHEMA;

#[test]
fn state_without_database_has_no_handles() {
    let state = AppState::new(DbHandles::absent());
    assert!(state.db().is_none());
    assert!(state.pool().is_none());
    assert_eq!(state.handles().source(), ResolvedSource::None);
}

#[tokio::test]
async fn cloned_state_shares_the_same_handles() {
    let env = EnvSnapshot::from_pairs([(LOCAL_DATABASE_URL, "postgres://localhost/dev")]);
    let handles = init_connection(resolve_connection_url(&env), &PoolSettings::default(), &SCHEMA).await.unwrap();
    let state = AppState::new(handles);
    let copy = state.clone();

    assert!(copy.db().is_some());
    assert_eq!(copy.handles().source(), ResolvedSource::LocalDev);
    assert!(std::ptr::eq(state.db().unwrap().schema(), copy.db().unwrap().schema()));
}
