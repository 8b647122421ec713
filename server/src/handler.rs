use std::ops::Deref;
use std::sync::Arc;

/// Shared router state. Cloning only bumps the reference count.
pub struct AppModule<D>(Arc<Handler<D>>);

impl<D> AppModule<D> {
    pub fn new(handler: Handler<D>) -> Self {
        Self(Arc::new(handler))
    }
}

impl<D> Clone for AppModule<D> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<D> Deref for AppModule<D> {
    type Target = Handler<D>;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

/// Holds the store every book service runs against.
pub struct Handler<D> {
    database: D,
}

impl<D> Handler<D> {
    pub fn new(database: D) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &D {
        &self.database
    }
}
