// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {futures::channel::mpsc, log::warn};

#[derive(Debug)]
pub struct UnboundedSink<T> {
    sink: mpsc::UnboundedSender<T>,
}

impl<T> Clone for UnboundedSink<T> {
    fn clone(&self) -> Self {
        UnboundedSink { sink: self.sink.clone() }
    }
}

impl<T> UnboundedSink<T> {
    pub fn new(sink: mpsc::UnboundedSender<T>) -> Self {
        UnboundedSink { sink }
    }

    pub fn send(&self, msg: T) {
        if let Err(e) = self.sink.unbounded_send(msg) {
            // If the other side has disconnected, we can still technically function,
            // so only note the dropped message.
            if e.is_full() {
                warn!("unbounded channel reported full; dropping message");
            }
        }
    }
}
