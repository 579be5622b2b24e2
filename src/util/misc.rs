use std::fmt;

pub fn vec_count<T: PartialEq>(v: &[T], e: &T) -> usize {
    v.iter().filter(|&n| n == e).count()
}

pub fn vec_to_string<T: fmt::Display>(v: &[T]) -> String {
    let vs: Vec<String> = v.iter().map(|x| format!("{}", x)).collect();
    "[".to_string() + &vs.join(", ") + "]"
}

// 直積 いずれかのリストが空の場合は空
pub fn cartesian_product<T>(vv: &[Vec<T>]) -> Vec<Vec<&T>> {
    if vv.is_empty() || vv.iter().any(|l| l.is_empty()) {
        return vec![];
    }

    let lens: Vec<usize> = vv.iter().map(|l| l.len()).collect();
    let mut idxs = vec![0; vv.len()];
    let mut res = vec![];
    loop {
        res.push(idxs.iter().enumerate().map(|(i1, &i2)| &vv[i1][i2]).collect());

        // increment idxs
        let mut i = idxs.len();
        loop {
            if i == 0 {
                return res;
            }
            i -= 1;
            if idxs[i] + 1 < lens[i] {
                idxs[i] += 1;
                break;
            }
            idxs[i] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_of_three_lists() {
        let vv = vec![vec![1, 2], vec![3], vec![4, 5, 6]];
        let res = cartesian_product(&vv);
        assert_eq!(res.len(), 6);
        assert_eq!(res[0], vec![&1, &3, &4]);
        assert_eq!(res[5], vec![&2, &3, &6]);
    }

    #[test]
    fn empty_list_gives_empty_product() {
        let vv: Vec<Vec<u8>> = vec![vec![1], vec![]];
        assert!(cartesian_product(&vv).is_empty());
    }

    #[test]
    fn to_string_and_count() {
        assert_eq!(vec_to_string(&[1, 2, 3]), "[1, 2, 3]");
        assert_eq!(vec_count(&[1, 2, 1], &1), 2);
    }
}
