use crate::server::ServerRouter;

mod posts;
mod users;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .merge(users::routes())
        .merge(posts::routes())
}
