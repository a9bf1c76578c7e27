// implemented by owners of subscriptions or glib sources that would otherwise keep an Rc cycle alive
pub trait Destroyable {
    fn destroy(&mut self);
}
