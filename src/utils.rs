/// A trait that provides easy access to the first element of a slice.
pub trait Front<T> {
    fn front(&self) -> Option<&T>;
}

/// A trait that provides easy access to the last element of a slice.
pub trait Back<T> {
    fn back(&self) -> Option<&T>;
}

impl<T> Front<T> for [T] {
    #[inline(always)]
    fn front(&self) -> Option<&T> {
        self.first()
    }
}

impl<T> Back<T> for [T] {
    #[inline(always)]
    fn back(&self) -> Option<&T> {
        self.last()
    }
}

/// A trait to replace all elements in a container with zeros.
pub trait ZeroOut {
    fn zero_out(&mut self);
}

impl ZeroOut for f64 {
    fn zero_out(&mut self) {
        *self = 0.0;
    }
}

impl<T> ZeroOut for [T]
where
    T: ZeroOut,
{
    fn zero_out(&mut self) {
        for elem in self {
            elem.zero_out();
        }
    }
}

impl<T> ZeroOut for Vec<T>
where
    T: ZeroOut,
{
    fn zero_out(&mut self) {
        self.as_mut_slice().zero_out();
    }
}
