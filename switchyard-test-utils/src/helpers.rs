// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use switchyard_core::ReceiverRef;

/// Builds the entry list taken by `enable`/`disable` style operations.
pub fn entries<T: ?Sized>(receivers: &[&ReceiverRef<T>]) -> Vec<Option<ReceiverRef<T>>> {
    receivers
        .iter()
        .map(|receiver| Some((*receiver).clone()))
        .collect()
}
