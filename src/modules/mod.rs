pub mod store;

pub mod models {
    pub mod heat;
    pub mod racer;
}

pub mod engine {
    pub mod builder;
    pub mod restructure;
    pub mod router;
    pub mod sizer;
}

pub mod helpers {
    pub mod general;
    pub mod logging;
}
